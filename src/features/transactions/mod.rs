//! Retail transactions.
//!
//! A transaction groups orders for one client. Its `total_price` is derived from
//! the orders and the discount (see [`services::totals`]); cancelling it puts the
//! ordered units back into stock.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/transactions` | List transactions (filter by status, client) |
//! | POST | `/api/transactions` | Open a transaction, optionally moving orders in |
//! | GET | `/api/transactions/{id}` | Get with order IDs |
//! | PUT | `/api/transactions/{id}` | Replace client, status, discount, date |
//! | PATCH | `/api/transactions/{id}/status` | Change status |
//! | POST | `/api/transactions/{id}/orders/{order_id}` | Attach an order |
//! | POST | `/api/transactions/{id}/recalculate` | Recompute the total |
//! | DELETE | `/api/transactions/{id}` | Delete with orders and returns |
//! | GET | `/api/clients/{id}/transactions` | Transactions of a client |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::TransactionService;
