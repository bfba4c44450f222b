pub mod account;
pub mod order;
pub mod product;
pub mod reset_token;
pub mod supplier;

pub use account::{Account, AccountResponse, Role};
pub use order::{
    Order, OrderDetail, OrderItem, OrderItemDetail, OrderItemResponse, OrderResponse, OrderStatus,
    PaymentMethod, PaymentStatus,
};
pub use product::{Product, ProductFilter, ProductSort, SortOrder, CATEGORIES};
pub use reset_token::ResetToken;
pub use supplier::{Supplier, SupplierResponse};
