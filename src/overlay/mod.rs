pub mod controller;
pub mod dispatcher;
pub mod events;
pub mod geometry;
pub mod headless; // In-memory surface for replay and tests
pub mod highlight;
pub mod layout;
pub mod panel;
pub mod selection;
pub mod surface;
pub mod theme;
pub mod trigger;

pub use controller::OverlayController;
pub use dispatcher::{CompletionTicket, DispatchError, PendingCompletion};
pub use events::{Command, Key, Modifiers, OverlayEvent};
pub use geometry::{Point, Rect, Viewport};
pub use headless::HeadlessPage;
pub use layout::{MoveDirection, PanelPlacement};
pub use surface::{EventTarget, HostSurface, SurfaceError};
pub use theme::Theme;
