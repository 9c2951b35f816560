pub mod debounce;
pub mod labels;
pub mod popup;
pub mod render;
pub mod style;
pub mod transaction;
pub mod view;

pub use debounce::{DebounceTicket, Debouncer};
pub use labels::{Label, LabelPlacer};
pub use popup::{popup_html, PlotDetails};
pub use render::{build_layer, content_hash, PlotLayer, RenderedPlot, Viewport, DEFAULT_VIEW};
pub use style::{plot_style, PlotStyle, StyleInput};
pub use transaction::OrderTransaction;
pub use view::{ErrorPanel, MapPhase, MapView, Notification, PanelAction, RenderOutcome};
