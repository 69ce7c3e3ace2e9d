pub mod cart;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use cart::CartLineDetail;
pub use order::{Order, OrderItemDetail, OrderStatus, PaymentType};
pub use product::Product;
pub use review::ReviewDetail;
pub use user::User;
