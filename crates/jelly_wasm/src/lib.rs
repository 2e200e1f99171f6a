//! WASM bindings that let a browser renderer drive a `jelly_core` jellyfish.
mod jellyfish;

pub use jellyfish::WasmJellyfish;
