//! XML signature placement and ID resolution

use serde::{Deserialize, Serialize};

/// Where the signature element is inserted relative to the node selected by XPath
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmlInsertionOption {
    AppendChild,
    PrependChild,
    AppendSibling,
    PrependSibling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlNamespace {
    pub prefix: String,
    pub uri: String,
}

/// Prefix bindings used to evaluate XPath expressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNamespaceManager {
    namespaces: Vec<XmlNamespace>,
}

impl XmlNamespaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.add_namespace(prefix, uri);
        self
    }

    pub fn add_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.namespaces.push(XmlNamespace {
            prefix: prefix.into(),
            uri: uri.into(),
        });
    }

    pub fn namespaces(&self) -> &[XmlNamespace] {
        &self.namespaces
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

/// Wire model of the signature element location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureElementLocation {
    #[serde(rename = "xPath")]
    pub x_path: String,
    pub insertion_option: XmlInsertionOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<XmlNamespace>>,
}

impl SignatureElementLocation {
    pub fn new(
        x_path: impl Into<String>,
        insertion_option: XmlInsertionOption,
        namespace_manager: Option<&XmlNamespaceManager>,
    ) -> Self {
        Self {
            x_path: x_path.into(),
            insertion_option,
            namespaces: namespace_manager
                .filter(|nsm| !nsm.is_empty())
                .map(|nsm| nsm.namespaces().to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlQualifiedName {
    pub local_name: String,
    pub namespace: Option<String>,
}

impl XmlQualifiedName {
    pub fn new(local_name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            local_name: local_name.into(),
            namespace: namespace.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlElementIdAttribute {
    pub element: XmlQualifiedName,
    pub attribute: XmlQualifiedName,
}

/// Tells the server which attributes hold element IDs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlIdResolutionTable {
    pub element_id_attributes: Vec<XmlElementIdAttribute>,
    pub global_id_attributes: Vec<XmlQualifiedName>,
    pub include_xml_id_attribute: Option<bool>,
}

impl XmlIdResolutionTable {
    pub fn new(include_xml_id_global_attribute: Option<bool>) -> Self {
        Self {
            include_xml_id_attribute: include_xml_id_global_attribute,
            ..Default::default()
        }
    }

    /// Treat an attribute as an ID on every element.
    pub fn add_global_id_attribute(
        &mut self,
        id_attribute_local_name: impl Into<String>,
        id_attribute_namespace: Option<&str>,
    ) {
        self.global_id_attributes.push(XmlQualifiedName::new(
            id_attribute_local_name,
            id_attribute_namespace,
        ));
    }

    /// Treat an attribute as an ID on one element type only.
    pub fn set_element_id_attribute(
        &mut self,
        element_local_name: impl Into<String>,
        element_namespace: Option<&str>,
        id_attribute_local_name: impl Into<String>,
        id_attribute_namespace: Option<&str>,
    ) {
        self.element_id_attributes.push(XmlElementIdAttribute {
            element: XmlQualifiedName::new(element_local_name, element_namespace),
            attribute: XmlQualifiedName::new(id_attribute_local_name, id_attribute_namespace),
        });
    }
}
