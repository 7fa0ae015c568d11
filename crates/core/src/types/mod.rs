//! Domain types shared by the storefront, admin and CLI.

pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod status;
pub mod timestamp;
pub mod toast;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Address, Order, OrderItem, ProductRef, UserRef};
pub use price::Price;
pub use status::*;
pub use timestamp::{display_date, display_datetime};
pub use toast::{TOAST_AUTO_HIDE, Toast, ToastKind, ToastSlot, ToastView};
