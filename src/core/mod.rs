pub mod config;
pub mod directives;
pub mod policy;
pub mod settings;
pub mod source;

pub use config::{resolve, CspConfigBuilder, PartialConfig, RawConfig, ResolvedConfig};
pub use directives::{DirectiveMap, DirectiveName, DirectiveValue};
pub use policy::{
    build_header, CspHeader, CspPolicy, PrecomputedHeader, RenderedPolicy, ResolvedPolicy,
};
pub use settings::{CspDefaults, NoSettings, Settings};
pub use source::Source;
