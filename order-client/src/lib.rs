//! order-client: the browser client's logic as a library.
//!
//! - [`draft`]: an editable order that re-derives its total and payment status
//!   after every change to items or the paid amount.
//! - [`navigation`]: the view/focus state machine driven by discrete actions.
//! - [`api`]: a typed async client over every route of the order service.

pub mod api;
pub mod draft;
pub mod error;
pub mod navigation;

pub use api::{ApiHealth, OrderApiClient};
pub use draft::{DraftItem, OrderDraft, DEFAULT_PAYMENT_METHOD};
pub use error::{ClientError, DraftError};
pub use navigation::{Action, NavigationError, Navigator, OrderFocus, Theme, View};
