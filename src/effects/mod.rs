//! Shader effects
//!
//! This module provides the effect runtime used by the workbench:
//! - A typed parameter model discovered from compiled programs
//! - `Effect`/`EffectFactory` traits so new effect families can be plugged in
//! - A registry of factories keyed by name and file extension
//! - The GLSL effect family (`glsl/`)
//!
//! # Architecture
//!
//! - **Data types** (`types.rs`): `Parameter`, `ParameterKind`, `ParameterValue`
//! - **Traits** (`traits.rs`): `Effect` and `EffectFactory`
//! - **Registry** (`registry.rs`): explicit registry object handed to the host
//! - **Clock** (`clock.rs`): running time for animated effects
//!
//! # Usage
//!
//! ```ignore
//! let registry = EffectRegistry::with_builtin();
//! let factory = registry.find_by_extension("glsl").unwrap();
//! let mut effect = factory.create_effect(device.clone(), textures.clone());
//!
//! let mut messages = MessageLog::new();
//! if effect.build(Some(&mut messages)) {
//!     effect.begin();
//!     effect.begin_pass(0);
//!     // draw the test object
//!     effect.end_pass();
//!     effect.end();
//! }
//! ```

mod clock;
pub mod glsl;
mod registry;
mod traits;
mod types;

pub use clock::*;
pub use registry::*;
pub use traits::*;
pub use types::*;
