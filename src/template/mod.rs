//! Template definitions, use sites and monomorphization.
//!
//! ## Components
//!
//! - [`parse_definition`]: recognize a template definition
//! - [`parse_arguments`]: recognize a use site's argument list
//! - [`replace_parameters`]: whole-word parameter substitution
//! - [`render_placeholder`]: the non-parametric stand-in declaration
//! - [`DefinitionTable`]: per-file definition storage and resolution
//! - [`intern_specialization`]: cached monomorphization per argument tuple

mod arguments;
mod definition;
mod lookup;
mod placeholder;
mod specialization;
mod substitution;

pub use arguments::parse_arguments;
pub use definition::{
    parse_definition, split_parameters, TemplateDefinition, TemplateParameter,
    TemplateParameterKind,
};
pub use lookup::{DefId, DefinitionTable};
pub use placeholder::{placeholder_body, render_placeholder};
pub use specialization::{
    intern_specialization, sanitize_scope, sanitize_token, Specialization,
};
pub use substitution::{find_identifier, replace_parameters};
