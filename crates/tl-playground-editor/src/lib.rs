//! Static editor data for the Teal playground: the example snippet
//! catalog and the Teal syntax-highlighting definition.

pub mod language;
pub mod snippets;

pub use language::{configuration, language, LanguageConfiguration, MonarchLanguage, LANGUAGE_ID};
pub use snippets::{default_snippet, Snippet};
