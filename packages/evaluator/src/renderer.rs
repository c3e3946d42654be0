//! # Tree Renderer
//!
//! Walks a schema tree against a [`DataContext`] and produces [`RenderNode`]s.
//!
//! ## Node interpretation
//!
//! Every node first passes the visibility check; a hidden node renders
//! nothing and its subtree is never evaluated. Visible nodes are interpreted
//! by their discriminator:
//!
//! - `wrapper`: a container element holding the rendered children, or the
//!   templated content split into text units, or nothing at all.
//! - `type`: dispatched through the [`Registry`]. Handlers that take children
//!   recurse through [`Scope::render_children`], which applies the same
//!   ordering and visibility rules.
//! - neither: children or content render as a fragment; an empty node is
//!   reported as unrenderable.
//!
//! ## Ordering
//!
//! Siblings render in ascending `index`. Unindexed siblings follow, in source
//! order. Output never depends on source array order.
//!
//! ## Fault isolation
//!
//! A handler error or panic is caught at the dispatch boundary, reported with
//! the node's type and data path, and the node renders nothing. Siblings and
//! parents are unaffected.

use crate::channel::SharedChannel;
use crate::context::DataContext;
use crate::diagnostics::{codes, Diagnostic, DiagnosticsSink, TracingSink};
use crate::error::{RenderError, RenderResult};
use crate::presenter::{PresentationUnit, Presenter, WidgetPresenter};
use crate::registry::Registry;
use crate::style_variants::{enrich, CONTENT_PART};
use crate::template::resolve_template;
use crate::visibility::{is_visible, VisibilityRules};
use crate::vdom::{RenderNode, RenderOutput};
use serde_json::Value;
use std::borrow::Cow;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use survey_dash_schema::{order_by_index, ComponentDescriptor, SchemaDocument, SchemaResult};
use tracing::{debug, info, instrument};

/// Context key holding the id of the section being rendered
pub const CURRENT_SECTION_KEY: &str = "currentSection";

/// Per-pass inputs derived from user interaction
#[derive(Debug, Default, Clone)]
pub struct SectionInputs {
    /// Entity the user selected, injected under the selected key
    pub selected: Option<Value>,
    /// Item on display, injected under the item key
    pub item: Option<Value>,
    /// Channel carried over from a previous pass of the same section
    pub channel: Option<SharedChannel>,
}

/// Schema interpreter
pub struct Renderer {
    registry: Registry,
    rules: VisibilityRules,
    presenter: Box<dyn Presenter>,
    sink: Rc<dyn DiagnosticsSink>,
    /// Diagnostics of the section pass in progress, if any
    pass_log: RefCell<Option<Vec<Diagnostic>>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            rules: VisibilityRules::default(),
            presenter: Box::new(WidgetPresenter),
            sink: Rc::new(TracingSink),
            pass_log: RefCell::new(None),
        }
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_rules(mut self, rules: VisibilityRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    pub fn with_diagnostics(mut self, sink: Rc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn rules(&self) -> &VisibilityRules {
        &self.rules
    }

    /// Render one schema tree. `None` when the root is hidden or renders nothing.
    #[instrument(skip_all, fields(component = descriptor.label()))]
    pub fn render(&self, descriptor: &ComponentDescriptor, ctx: &DataContext) -> Option<RenderNode> {
        if !is_visible(descriptor, ctx, &self.rules) {
            debug!("Root node hidden");
            return None;
        }
        let enriched = enrich(descriptor);
        self.interpret(&enriched, ctx)
    }

    /// Render sibling trees in index order
    pub fn render_all(&self, descriptors: &[ComponentDescriptor], ctx: &DataContext) -> Vec<RenderNode> {
        order_by_index(descriptors)
            .into_iter()
            .filter_map(|d| self.render(d, ctx))
            .collect()
    }

    /// Render one section of a schema document in a fresh data context.
    ///
    /// With no `section_id` the first section is rendered.
    #[instrument(skip(self, document, data, inputs))]
    pub fn render_section(
        &self,
        document: &SchemaDocument,
        section_id: Option<&str>,
        data: Value,
        inputs: SectionInputs,
    ) -> SchemaResult<RenderOutput> {
        let section = match section_id {
            Some(id) => document.section(id)?,
            None => document.first_section()?,
        };
        info!(section = %section.id, "Rendering section");
        self.pass_log.replace(Some(Vec::new()));

        let mut ctx = DataContext::new(data)
            .with_derived(CURRENT_SECTION_KEY, Value::String(section.id.clone()));
        if let Some(selected) = inputs.selected {
            ctx = ctx.with_derived(&self.rules.selected_key, selected);
        }
        if let Some(item) = inputs.item {
            ctx = ctx.with_derived(&self.rules.item_key, item);
        }
        if let Some(channel) = inputs.channel {
            ctx = ctx.with_channel(channel);
        }

        let mut nodes = self.render_all(&section.components, &ctx);
        for subsection in &section.subsections {
            let children = self.render_all(&subsection.components, &ctx);
            if children.is_empty() {
                debug!(subsection = %subsection.id, "Subsection rendered nothing, omitting");
                continue;
            }
            let mut container = RenderNode::element("section")
                .with_id(subsection.id.clone())
                .with_classes(vec!["subsection".to_string()]);
            if let Some(title) = &subsection.title {
                container = container.with_child(
                    RenderNode::element("h3").with_child(RenderNode::text(resolve_template(&ctx, title))),
                );
            }
            nodes.push(container.with_children(children));
        }

        let diagnostics = self.pass_log.take().unwrap_or_default();
        info!(
            section = %section.id,
            nodes = nodes.len(),
            diagnostics = diagnostics.len(),
            "Section render complete"
        );
        Ok(RenderOutput {
            section: section.id.clone(),
            title: section.title.as_deref().map(|t| resolve_template(&ctx, t)),
            nodes,
            shared: ctx.existing_channel().map(SharedChannel::snapshot),
            diagnostics,
        })
    }

    /// Visit an already enriched node
    fn visit(&self, descriptor: &ComponentDescriptor, ctx: &DataContext) -> Option<RenderNode> {
        if !is_visible(descriptor, ctx, &self.rules) {
            debug!(component = descriptor.label(), "Node hidden, skipping subtree");
            return None;
        }
        self.interpret(descriptor, ctx)
    }

    fn render_children(&self, descriptor: &ComponentDescriptor, ctx: &DataContext) -> Vec<RenderNode> {
        descriptor
            .ordered_children()
            .into_iter()
            .filter_map(|child| self.visit(child, ctx))
            .collect()
    }

    fn interpret(&self, descriptor: &ComponentDescriptor, ctx: &DataContext) -> Option<RenderNode> {
        if let Some(tag) = descriptor.wrapper.as_deref().filter(|t| !t.is_empty()) {
            return Some(self.render_wrapper(tag, descriptor, ctx));
        }

        if let Some(kind) = descriptor.type_tag().filter(|t| !t.is_empty()) {
            return self.dispatch(kind, descriptor, ctx);
        }

        if descriptor.has_children() {
            return Some(RenderNode::fragment(self.render_children(descriptor, ctx)));
        }

        if let Some(body) = descriptor.body() {
            let units = text_units(&resolve_template(ctx, body), &descriptor.classes_for(CONTENT_PART));
            return Some(RenderNode::fragment(units));
        }

        self.report(
            Diagnostic::warning(
                codes::UNRENDERABLE,
                "Node has no type, wrapper, content or children",
            )
            .for_node(descriptor),
        );
        None
    }

    fn render_wrapper(&self, tag: &str, descriptor: &ComponentDescriptor, ctx: &DataContext) -> RenderNode {
        let element = RenderNode::element(tag)
            .with_classes(descriptor.classes())
            .with_styles(descriptor.style.clone());

        if descriptor.has_children() {
            element.with_children(self.render_children(descriptor, ctx))
        } else if let Some(body) = descriptor.body() {
            let text = resolve_template(ctx, body);
            element.with_children(text_units(&text, &descriptor.classes_for(CONTENT_PART)))
        } else {
            element
        }
    }

    fn dispatch(&self, kind: &str, descriptor: &ComponentDescriptor, ctx: &DataContext) -> Option<RenderNode> {
        let Some(handler) = self.registry.get(kind) else {
            self.report(
                Diagnostic::warning(codes::UNKNOWN_TYPE, format!("No handler registered for '{}'", kind))
                    .for_node(descriptor),
            );
            return None;
        };

        let scope = Scope {
            renderer: self,
            context: ctx,
        };
        match panic::catch_unwind(AssertUnwindSafe(|| handler(descriptor, &scope))) {
            Ok(Ok(node)) => node,
            Ok(Err(err)) => {
                self.report(
                    Diagnostic::error(err.code(), format!("'{}' rendered nothing: {}", kind, err))
                        .for_node(descriptor),
                );
                None
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                self.report(
                    Diagnostic::error(
                        codes::HANDLER_FAILED,
                        format!("'{}' handler panicked: {}", kind, message),
                    )
                    .for_node(descriptor),
                );
                None
            }
        }
    }

    /// Send to the sink, and record when a section pass is collecting
    fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(&diagnostic);
        if let Some(log) = self.pass_log.borrow_mut().as_mut() {
            log.push(diagnostic);
        }
    }
}

/// What a handler sees of the render pass
pub struct Scope<'a> {
    renderer: &'a Renderer,
    context: &'a DataContext,
}

impl<'a> Scope<'a> {
    pub fn context(&self) -> &'a DataContext {
        self.context
    }

    pub fn rules(&self) -> &'a VisibilityRules {
        &self.renderer.rules
    }

    pub fn resolve(&self, path: &str) -> Option<Cow<'a, Value>> {
        self.context.resolve(path)
    }

    pub fn template(&self, text: &str) -> String {
        resolve_template(self.context, text)
    }

    /// The node's `dataPath`, required
    pub fn data_path<'d>(&self, descriptor: &'d ComponentDescriptor) -> RenderResult<&'d str> {
        descriptor
            .data_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| RenderError::config("dataPath", "required by this component"))
    }

    /// Value at the node's `dataPath`
    pub fn data(&self, descriptor: &ComponentDescriptor) -> RenderResult<Cow<'a, Value>> {
        let path = self.data_path(descriptor)?;
        self.resolve(path)
            .filter(|v| !v.is_null())
            .ok_or_else(|| RenderError::missing(path))
    }

    /// Non-empty array at the node's `dataPath`
    pub fn data_array(&self, descriptor: &ComponentDescriptor) -> RenderResult<Vec<Value>> {
        let path = self.data_path(descriptor)?;
        match self.data(descriptor)?.as_array() {
            Some(items) if !items.is_empty() => Ok(items.clone()),
            Some(_) => Err(RenderError::missing(path)),
            None => Err(RenderError::InvalidData {
                path: path.to_string(),
                expected: "an array",
            }),
        }
    }

    /// Render the node's children in this scope's context
    pub fn render_children(&self, descriptor: &ComponentDescriptor) -> Vec<RenderNode> {
        self.renderer.render_children(descriptor, self.context)
    }

    /// Render the node's children in another context, e.g. one collection item
    pub fn render_children_in(&self, descriptor: &ComponentDescriptor, ctx: &DataContext) -> Vec<RenderNode> {
        self.renderer.render_children(descriptor, ctx)
    }

    pub fn present(&self, unit: PresentationUnit) -> RenderResult<RenderNode> {
        self.renderer.presenter.present(unit)
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.renderer.report(diagnostic);
    }
}

/// Split text into paragraph units. Blank lines become spacers.
pub fn text_units(text: &str, classes: &[String]) -> Vec<RenderNode> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').trim())
        .map(|line| {
            if line.is_empty() {
                RenderNode::Spacer
            } else {
                RenderNode::text(line).with_classes(classes.to_vec())
            }
        })
        .collect()
}
