//! Cache adapters implementing the `ListCache` port.

mod redis_list_cache;

pub use redis_list_cache::{CacheConfig, RedisListCache};
