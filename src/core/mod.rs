// src/core/mod.rs
//! Assembly, validation and rendering building blocks

pub mod assembler;
pub mod config_manager;
pub mod docx;
pub mod fs_ops;
pub mod normalizer;
pub mod ooxml;
pub mod preview;
pub mod template_engine;
pub mod validator;

pub use config_manager::ConfigManager;
pub use docx::{DocumentRenderer, DocxPackage, DocxTemplateRenderer};
pub use fs_ops::FsOps;
pub use preview::{DocxHtmlConverter, PreviewConverter, SharedPreview};
pub use template_engine::TemplateEngine;
