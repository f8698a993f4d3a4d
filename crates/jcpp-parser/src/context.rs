//! Method context supplied by the structural parser.
//!
//! The structural parser owns class-level parsing. For each method body it
//! hands over the parameter list and the signatures of the enclosing
//! classes, innermost first, so identifiers that are not locals can still
//! be classified.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSignature {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSignature {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub parameter_count: usize,
    #[serde(default)]
    pub is_static: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSignature {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSignature>,
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodContext {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSignature>,
    /// Enclosing classes, innermost first.
    #[serde(default)]
    pub classes: Vec<ClassSignature>,
    #[serde(default)]
    pub is_static: bool,
}

impl MethodContext {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn named(name: impl Into<String>) -> Self {
        MethodContext {
            name: name.into(),
            ..MethodContext::default()
        }
    }

    pub fn with_parameter(mut self, name: &str, type_name: &str) -> Self {
        self.parameters.push(ParameterSignature {
            name: name.to_string(),
            type_name: type_name.to_string(),
            is_final: false,
        });
        self
    }

    pub fn with_class(mut self, class: ClassSignature) -> Self {
        self.classes.push(class);
        self
    }

    /// Depth (0 = innermost) of the enclosing class called `name`.
    pub fn class_depth(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|c| c.name == name)
    }

    /// Field `name`, searched from the innermost class outwards.
    pub fn find_field(&self, name: &str) -> Option<(usize, &FieldSignature)> {
        self.classes.iter().enumerate().find_map(|(depth, class)| {
            class
                .fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| (depth, f))
        })
    }

    /// Method `name` taking `argc` arguments, starting at class `from_depth`.
    pub fn find_method(&self, from_depth: usize, name: &str, argc: usize) -> Option<&MethodSignature> {
        self.classes.iter().skip(from_depth).find_map(|class| {
            class
                .methods
                .iter()
                .find(|m| m.name == name && m.parameter_count == argc)
                .or_else(|| class.methods.iter().find(|m| m.name == name))
        })
    }
}

impl ClassSignature {
    pub fn new(name: impl Into<String>) -> Self {
        ClassSignature {
            name: name.into(),
            ..ClassSignature::default()
        }
    }

    pub fn with_field(mut self, name: &str, type_name: &str) -> Self {
        self.fields.push(FieldSignature {
            name: name.to_string(),
            type_name: type_name.to_string(),
            is_static: false,
            is_final: false,
        });
        self
    }

    pub fn with_method(mut self, name: &str, return_type: &str, parameter_count: usize) -> Self {
        self.methods.push(MethodSignature {
            name: name.to_string(),
            return_type: return_type.to_string(),
            parameter_count,
            is_static: false,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSignature> {
        self.fields.iter().find(|f| f.name == name)
    }
}
