//! The built-in generator registry.
//!
//! A closed mapping from canonical language identifiers to statically
//! linked generator functions. Identifiers not listed here fall through to
//! the plugin adapter; the registry is extended by the implementer, never
//! at runtime.

use crate::generator::{GeneratorFn, ProjectGenerator, RegistryGenerator};

const REGISTRY: &[(&str, GeneratorFn)] = &[
    ("typescript", strato_codegen_typescript::generate_project),
    ("python", strato_codegen_python::generate_project),
];

/// Look up a statically linked generator for a canonical identifier.
pub fn lookup(language: &str) -> Option<Box<dyn ProjectGenerator>> {
    REGISTRY.iter().find(|(name, _)| *name == language).map(
        |&(language, generate)| {
            Box::new(RegistryGenerator { language, generate }) as Box<dyn ProjectGenerator>
        },
    )
}

/// Canonical identifiers with a built-in generator.
pub fn supported_languages() -> Vec<&'static str> {
    REGISTRY.iter().map(|&(name, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_languages() {
        for language in supported_languages() {
            let generator = lookup(language).expect("registry language should resolve");
            assert_eq!(generator.language(), language);
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(lookup("TypeScript").is_none());
        assert!(lookup("dotnet").is_none());
        assert!(lookup("").is_none());
    }
}
