//! Redis storage implementation
//!
//! ## Module Structure
//!
//! - `pool` - Connection setup, liveness ping and URL sanitizing
//! - `atomic` - Fixed-window counter increments (`CounterStore` implementation)

mod atomic;
mod pool;


pub use pool::RedisPool;
