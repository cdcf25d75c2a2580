//! Runnable examples for BRCode.
//!
//! ```text
//! PIX_KEY=92113026000164 PIX_NAME="Prodasiq Sistemas" PIX_CITY="PORTO ALEGRE" \
//!     cargo run -p brcode-example --example generate -- 1000.00 aprazo "Pedido 42"
//! cargo run -p brcode-example --example verify -- "<payload>"
//! ```
