//! Type and call hierarchies.
//!
//! Type parents come from the parsed unit, everything that needs to see
//! beyond it (children, callers, callees) comes from the index.

mod call_hierarchy;
mod item;
mod payload;
mod type_hierarchy;

pub use call_hierarchy::{CallHierarchyItem, IncomingCall, OutgoingCall, incoming_calls, outgoing_calls, prepare_call_hierarchy};
pub use item::{HierarchyItem, decl_to_item, symbol_kind_of, symbol_to_item};
pub use payload::{TypeHierarchyPayload, decode_call_payload, encode_call_payload};
pub use type_hierarchy::{
    TypeHierarchyDirection, TypeHierarchyItem, get_type_hierarchy, resolve_type_hierarchy, sub_types, super_types,
};
