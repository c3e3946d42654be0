pub mod channel;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod handlers;
pub mod path;
#[cfg(feature = "async")]
pub mod poller;
pub mod presenter;
pub mod registry;
pub mod renderer;
pub mod style_variants;
pub mod template;
pub mod vdom;
pub mod visibility;

#[cfg(test)]
mod tests_renderer;

#[cfg(test)]
mod tests_handlers;


#[cfg(test)]
mod tests_error_recovery;

pub use channel::{
    ChannelPoller, ChannelSnapshot, FilterControl, SharedChannel, Subscription, ToggleControl,
    WeakChannel, FILTER_ALL,
};
pub use context::{DataContext, SHARED_KEY};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticLevel, DiagnosticsSink, TracingSink};
pub use error::{RenderError, RenderResult};
#[cfg(feature = "async")]
pub use poller::{spawn_poller, PollerHandle, DEFAULT_POLL_INTERVAL};
pub use presenter::{PresentationUnit, Presenter, WidgetPresenter};
pub use registry::{Handler, Registry};
pub use renderer::{Renderer, Scope, SectionInputs, CURRENT_SECTION_KEY};
pub use template::resolve_template;
pub use vdom::{RenderNode, RenderOutput};
pub use visibility::{is_visible, VisibilityRules};
