//! # SSV Validator Test Suite
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs   # shared wiring: task source, interop keys, fixed clock
//!     ├── flows.rs      # stream client -> router -> signer against the task source
//!     └── runtime.rs    # the full validator runtime, slot by slot
//! ```
//!
//! ```bash
//! cargo test -p ssv-tests
//! ```

pub mod integration;
