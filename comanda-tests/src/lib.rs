mod menu;
mod mock;
mod orders;
mod staff;
mod stores;

pub use mock::*;

use comanda::{Client, Executor};
use log::LevelFilter;
use menu::menu;
use orders::{orders, synchronization};
use staff::staff;
use std::env;
use stores::stores;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs the end to end suite against a store reached through `client`.
pub async fn execute_tests<E: Executor + 'static>(client: Client<E>) {
    client
        .ensure_schema()
        .await
        .expect("Failed to initialize the schema");
    stores(&client).await;
    menu(&client).await;
    staff(&client).await;
    orders(&client).await;
    synchronization(&client).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
