//! # Snippet Assembler
//!
//! Template files embed host-language code: `using` directives, code blocks
//! and boolean lambdas. None of these pieces is analyzable on its own, so the
//! [`Assembler`] stitches them into one synthetic document, hands it to an
//! [`AnalysisBackend`](snippet_backend::AnalysisBackend), and translates every
//! result back into template coordinates through the [`Fragment`] that owns
//! it.
//!
//! ```rust,ignore
//! let mut assembler = Assembler::new(LexicalBackend::new(), registry);
//! assembler.add_using("using System;", 0)?;
//! assembler.add_block("var x = Class.Name;", 20)?;
//! assembler.finalize()?;
//! for token in assembler.tokens()? {
//!     println!("{} {}", token.category, token.range);
//! }
//! ```

mod assembler;
mod boilerplate;
mod error;
mod fragment;
mod output;

pub use assembler::Assembler;
pub use boilerplate::BoilerplateOptions;
pub use error::{AssemblerError, Result};
pub use fragment::{Fragment, FragmentKind};
pub use output::{CompileReport, ErrorToken, Symbol, Token};
