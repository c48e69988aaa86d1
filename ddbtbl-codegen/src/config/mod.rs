//! Configuration for ddbtbl-codegen

pub mod defaults;
mod settings;

pub use settings::CodegenConfig;
