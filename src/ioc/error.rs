/// Failures raised while wiring components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// Constructing a component recursed back into a component that is
    /// still being constructed. `chain` lists binding names in construction
    /// order and ends with the repeated name.
    #[error("cyclic dependency: {}", chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    /// A slot marked as required had no binding by name or by type.
    #[error("no component bound for slot '{slot}' ({type_name})")]
    Unresolved {
        slot: String,
        type_name: &'static str,
    },

    /// A component factory reported an error.
    #[error("failed to construct component '{name}': {message}")]
    Construction { name: String, message: String },
}
