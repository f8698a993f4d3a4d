//! Variable entries and the scope chain.
//!
//! Each paragraph keeps the variables declared directly in it. Lookup walks
//! the paragraph chain outwards, then falls back to the fields of the
//! enclosing classes; field hits are cached per name.

use crate::node::ParagraphId;
use bitflags::bitflags;
use jcpp_common::ValueCategory;
use jcpp_common::types::{classify_type, strip_array};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct VariableFlags: u8 {
        const ARRAY = 1 << 0;
        const FINAL = 1 << 1;
        const STATIC = 1 << 2;
        /// Not declared in the block that uses it: parameters and fields.
        const OUTSIDE_BLOCK = 1 << 3;
        const PARAMETER = 1 << 4;
        const FIELD = 1 << 5;
        /// Field of an enclosing (outer) class.
        const OUTER_CLASS = 1 << 6;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub type_name: String,
    pub flags: VariableFlags,
    pub category: ValueCategory,
    /// Declaring paragraph; `NONE` for fields.
    pub scope: ParagraphId,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        mut flags: VariableFlags,
        scope: ParagraphId,
        extra_containers: &[String],
    ) -> Variable {
        let type_name = type_name.into();
        if strip_array(&type_name).1 > 0 {
            flags |= VariableFlags::ARRAY;
        }
        let category = classify_type(&type_name, extra_containers);
        Variable {
            name: name.into(),
            type_name,
            flags,
            category,
            scope,
        }
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags.contains(VariableFlags::FINAL)
    }

    #[inline]
    pub fn is_outer_field(&self) -> bool {
        self.flags.contains(VariableFlags::OUTER_CLASS)
    }
}
