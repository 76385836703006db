//! Document element structs and value codecs
//!
//! Material and mapping documents are RON. Element attributes that carry a
//! declared type and a value stay strings: the loader dispatches on the type
//! and parses the value, so a malformed document fails with a precise error
//! instead of a deserializer guess.

use serde::{Deserialize, Serialize};

use crate::io::MaterialIoError;
use crate::math::Vec4;

/// Root of a material document, elements in declaration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MaterialDocument {
    pub materials: Vec<MaterialElement>,
}

/// One material element with its inputs in declaration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MaterialElement {
    pub name: String,
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub thin: bool,
    pub refraction_link_ior: bool,
    pub emission_doublesided: bool,
    pub sss_multyscatter: bool,
    pub layers: u32,
    pub inputs: Vec<InputElement>,
}

/// One typed input element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct InputElement {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Root of a mapping document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MappingDocument {
    pub mappings: Vec<MappingElement>,
}

/// One name-to-name mapping entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MappingElement {
    pub from: String,
    pub to: String,
}

/// Read and parse a RON document
pub(crate) fn read_document<T>(path: &str) -> Result<T, MaterialIoError>
where
    T: for<'de> Deserialize<'de>,
{
    let contents = std::fs::read_to_string(path)?;
    ron::from_str(&contents).map_err(|e| MaterialIoError::Parse(e.to_string()))
}

/// Serialize and write a RON document
pub(crate) fn write_document<T: Serialize>(path: &str, document: &T) -> Result<(), MaterialIoError> {
    let contents = ron::ser::to_string_pretty(document, Default::default())
        .map_err(|e| MaterialIoError::Serialize(e.to_string()))?;

    std::fs::write(path, contents)?;
    Ok(())
}

/// Directory prefix of a document path
///
/// Text up to and including the last path separator of either slash
/// convention; empty when the path has none. Asset paths are formed by plain
/// concatenation with the file names stored in the document.
pub(crate) fn base_dir(path: &str) -> &str {
    path.rfind(|c| c == '/' || c == '\\')
        .map_or("", |index| &path[..=index])
}

/// Encode a float4 value as four space-separated decimals, x y z w order
pub(crate) fn format_float4(value: &Vec4) -> String {
    format!("{} {} {} {}", value.x, value.y, value.z, value.w)
}

/// Parse a float4 value: exactly four whitespace-separated decimals
pub(crate) fn parse_float4(text: &str) -> Result<Vec4, MaterialIoError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 4 {
        return Err(MaterialIoError::MalformedFloat4(text.to_string()));
    }

    let mut values = [0.0_f32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| MaterialIoError::MalformedFloat4(text.to_string()))?;
    }

    Ok(Vec4::new(values[0], values[1], values[2], values[3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_float4_round_trip_is_exact() {
        let value = Vec4::new(0.1, -0.25, 1.0 / 3.0, 1e-7);
        let parsed = parse_float4(&format_float4(&value)).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_parse_float4_positional() {
        let parsed = parse_float4("0.25 0.5  0.75\t1").unwrap();
        assert_relative_eq!(parsed.x, 0.25);
        assert_relative_eq!(parsed.y, 0.5);
        assert_relative_eq!(parsed.z, 0.75);
        assert_relative_eq!(parsed.w, 1.0);
    }

    #[test]
    fn test_parse_float4_rejects_wrong_arity() {
        assert!(matches!(
            parse_float4("1 2 3"),
            Err(MaterialIoError::MalformedFloat4(_))
        ));
        assert!(matches!(
            parse_float4("1 2 3 4 5"),
            Err(MaterialIoError::MalformedFloat4(_))
        ));
    }

    #[test]
    fn test_parse_float4_rejects_garbage() {
        assert!(matches!(
            parse_float4("1 2 three 4"),
            Err(MaterialIoError::MalformedFloat4(_))
        ));
    }

    #[test]
    fn test_base_dir_both_conventions() {
        assert_eq!(base_dir("scenes/materials.ron"), "scenes/");
        assert_eq!(base_dir("C:\\data\\materials.ron"), "C:\\data\\");
        assert_eq!(base_dir("a\\b/materials.ron"), "a\\b/");
        assert_eq!(base_dir("materials.ron"), "");
    }

    #[test]
    fn test_input_element_type_attribute() {
        let element: InputElement =
            ron::from_str(r#"(name: "albedo", type: "float4", value: "0 0 0 1")"#).unwrap();
        assert_eq!(element.kind, "float4");

        let text = ron::to_string(&element).unwrap();
        assert!(text.contains("type"));
    }

    #[test]
    fn test_material_element_thin_defaults_to_false() {
        let element: MaterialElement = ron::from_str(
            r#"(
                name: "m",
                id: 0,
                type: "uberv2",
                refraction_link_ior: false,
                emission_doublesided: false,
                sss_multyscatter: false,
                layers: 16,
                inputs: [],
            )"#,
        )
        .unwrap();
        assert!(!element.thin);
    }
}
