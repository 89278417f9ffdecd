//! Shared name tables

use phf::{phf_set, Set};

/// Generic component type aliases whose single type argument describes the
/// props of the annotated variable (`const Button: FC<ButtonProps> = ...`).
pub static CONTAINER_TYPE_ALIASES: Set<&'static str> = phf_set! {
    "FC",
    "VFC",
    "FunctionComponent",
    "VoidFunctionComponent",
    "ComponentType",
    "React.FC",
    "React.VFC",
    "React.FunctionComponent",
    "React.VoidFunctionComponent",
    "React.ComponentType",
    "Component",
    "ParentComponent",
    "VoidComponent",
    "FlowComponent",
};

/// Default number of fix passes before the fixer gives up
pub const DEFAULT_MAX_FIX_PASSES: usize = 10;
