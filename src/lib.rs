pub use comanda_core::*;
