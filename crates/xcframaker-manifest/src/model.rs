//! In-memory model of a Swift package manifest.
//!
//! The shapes mirror `swift package dump-package` output so a manifest can
//! be deserialized directly from it. Values are treated as immutable: patches
//! build new values (see [`crate::patch`]).

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ManifestError, Result};
use crate::version::ToolsVersion;

/// A package manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Package display name.
    pub name: String,
    /// Manifest file the model was loaded from (not part of the JSON).
    #[serde(skip)]
    pub path: PathBuf,
    /// Declared `swift-tools-version`.
    pub tools_version: ToolsVersion,
    /// Minimum deployment targets.
    #[serde(default)]
    pub platforms: Vec<SupportedPlatform>,
    /// Declared products, in source order.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Package dependencies.
    #[serde(default)]
    pub dependencies: Vec<PackageDependency>,
    /// Targets, in source order.
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub swift_language_versions: Option<Vec<String>>,
    #[serde(default)]
    pub c_language_standard: Option<String>,
    #[serde(default)]
    pub cxx_language_standard: Option<String>,
    #[serde(default)]
    pub default_localization: Option<String>,
    #[serde(default)]
    pub pkg_config: Option<String>,
    #[serde(default)]
    pub providers: Option<Vec<SystemPackageProvider>>,
}

impl Manifest {
    /// Deserialize `swift package dump-package` output.
    pub fn from_dump_json(json: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let mut manifest: Manifest = serde_json::from_str(json)?;
        if manifest.name.trim().is_empty() {
            return Err(ManifestError::Invalid {
                detail: "package name is empty".to_string(),
            });
        }
        manifest.path = path.into();
        Ok(manifest)
    }

    /// Look up a product by name.
    pub fn product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Names of all declared products.
    pub fn product_names(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.name.as_str()).collect()
    }
}

/// A minimum deployment target entry (`.iOS("13.0")`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedPlatform {
    pub platform_name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

/// A product declared by the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProductType,
    pub targets: Vec<String>,
}

/// Product kind. dump-package encodes these as `{"library": ["automatic"]}`,
/// `{"executable": null}` and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Library((LibraryLinkage,)),
    Executable(()),
    Test(()),
    Plugin(()),
    Snippet(()),
    Macro(()),
}

impl ProductType {
    pub fn library(linkage: LibraryLinkage) -> Self {
        ProductType::Library((linkage,))
    }

    /// The linkage of a library product, `None` for other kinds.
    pub fn linkage(&self) -> Option<LibraryLinkage> {
        match self {
            ProductType::Library((linkage,)) => Some(*linkage),
            _ => None,
        }
    }

    /// Human-readable kind name with its article, for messages.
    pub fn describe(&self) -> &'static str {
        match self {
            ProductType::Library(_) => "a library",
            ProductType::Executable(_) => "an executable",
            ProductType::Test(_) => "a test",
            ProductType::Plugin(_) => "a plugin",
            ProductType::Snippet(_) => "a snippet",
            ProductType::Macro(_) => "a macro",
        }
    }
}

/// How a library product is linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryLinkage {
    Static,
    Dynamic,
    Automatic,
}

/// A package dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PackageDependency {
    SourceControl((SourceControlDependency,)),
    FileSystem((FileSystemDependency,)),
    Registry((RegistryDependency,)),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceControlDependency {
    pub identity: String,
    pub location: SourceControlLocation,
    pub requirement: Requirement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceControlLocation {
    Remote((RemoteUrl,)),
    Local((String,)),
}

impl SourceControlLocation {
    pub fn as_str(&self) -> &str {
        match self {
            SourceControlLocation::Remote((RemoteUrl::Wrapped { url_string },)) => url_string,
            SourceControlLocation::Remote((RemoteUrl::Plain(url),)) => url,
            SourceControlLocation::Local((path,)) => path,
        }
    }
}

/// Newer toolchains wrap the URL in `{"urlString": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteUrl {
    Wrapped {
        #[serde(rename = "urlString")]
        url_string: String,
    },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSystemDependency {
    pub identity: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDependency {
    pub identity: String,
    pub requirement: Requirement,
}

/// A dependency version requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Requirement {
    Range((VersionRange,)),
    Exact((String,)),
    Branch((String,)),
    Revision((String,)),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRange {
    pub lower_bound: String,
    pub upper_bound: String,
}

/// A target declared by the package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    #[serde(default)]
    pub dependencies: Vec<TargetDependency>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub public_headers_path: Option<String>,
    #[serde(default)]
    pub settings: Vec<TargetSetting>,
    #[serde(default)]
    pub pkg_config: Option<String>,
    #[serde(default)]
    pub providers: Option<Vec<SystemPackageProvider>>,
    #[serde(default)]
    pub plugin_capability: Option<PluginCapability>,
    #[serde(default)]
    pub plugin_usages: Option<Vec<PluginUsage>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Regular,
    Executable,
    Test,
    System,
    Binary,
    Plugin,
    Macro,
}

/// Platform/configuration condition attached to dependencies and settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub platform_names: Vec<String>,
    #[serde(default)]
    pub config: Option<String>,
}

impl Condition {
    pub fn is_empty(&self) -> bool {
        self.platform_names.is_empty() && self.config.is_none()
    }
}

/// A target's dependency on another target or product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTargetDependency", into = "RawTargetDependency")]
pub enum TargetDependency {
    ByName {
        name: String,
        condition: Option<Condition>,
    },
    Target {
        name: String,
        condition: Option<Condition>,
    },
    Product {
        name: String,
        package: Option<String>,
        module_aliases: Option<BTreeMap<String, String>>,
        condition: Option<Condition>,
    },
}

/// dump-package encodes target dependencies as positional arrays:
/// `{"byName": [name, condition]}`,
/// `{"product": [name, package, moduleAliases, condition]}`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum RawTargetDependency {
    ByName(Vec<Value>),
    Target(Vec<Value>),
    Product(Vec<Value>),
}

fn positional_string(items: &[Value], index: usize) -> Result<Option<String>> {
    match items.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ManifestError::Invalid {
            detail: format!("expected string in target dependency, found {other}"),
        }),
    }
}

fn positional<T: serde::de::DeserializeOwned>(items: &[Value], index: usize) -> Result<Option<T>> {
    match items.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => Ok(Some(serde_json::from_value(v.clone())?)),
    }
}

fn required_name(items: &[Value]) -> Result<String> {
    positional_string(items, 0)?.ok_or_else(|| ManifestError::Invalid {
        detail: "target dependency without a name".to_string(),
    })
}

impl TryFrom<RawTargetDependency> for TargetDependency {
    type Error = ManifestError;

    fn try_from(raw: RawTargetDependency) -> Result<Self> {
        match raw {
            RawTargetDependency::ByName(items) => Ok(TargetDependency::ByName {
                name: required_name(&items)?,
                condition: positional(&items, 1)?,
            }),
            RawTargetDependency::Target(items) => Ok(TargetDependency::Target {
                name: required_name(&items)?,
                condition: positional(&items, 1)?,
            }),
            // Toolchains before 5.7 omit the module-alias slot.
            RawTargetDependency::Product(items) => {
                let (module_aliases, condition) = if items.len() >= 4 {
                    (positional(&items, 2)?, positional(&items, 3)?)
                } else {
                    (None, positional(&items, 2)?)
                };
                Ok(TargetDependency::Product {
                    name: required_name(&items)?,
                    package: positional_string(&items, 1)?,
                    module_aliases,
                    condition,
                })
            }
        }
    }
}

fn to_value<T: Serialize>(value: &Option<T>) -> Value {
    value
        .as_ref()
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(Value::Null)
}

impl From<TargetDependency> for RawTargetDependency {
    fn from(dep: TargetDependency) -> Self {
        match dep {
            TargetDependency::ByName { name, condition } => {
                RawTargetDependency::ByName(vec![Value::String(name), to_value(&condition)])
            }
            TargetDependency::Target { name, condition } => {
                RawTargetDependency::Target(vec![Value::String(name), to_value(&condition)])
            }
            TargetDependency::Product {
                name,
                package,
                module_aliases,
                condition,
            } => RawTargetDependency::Product(vec![
                Value::String(name),
                to_value(&package),
                to_value(&module_aliases),
                to_value(&condition),
            ]),
        }
    }
}

/// A bundled resource (`.process("Resources")`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub rule: ResourceRule,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceRule {
    Process(ProcessRule),
    Copy(EmptyRule),
    EmbedInCode(EmptyRule),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRule {
    #[serde(default)]
    pub localization: Option<String>,
}

/// Placeholder for rules encoded as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyRule {}

/// Which tool a build setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingTool {
    C,
    Cxx,
    Swift,
    Linker,
}

/// A single build setting entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSetting", into = "RawSetting")]
pub struct TargetSetting {
    pub tool: SettingTool,
    pub kind: SettingKind,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKind {
    Define(String),
    HeaderSearchPath(String),
    UnsafeFlags(Vec<String>),
    LinkedLibrary(String),
    LinkedFramework(String),
    EnableUpcomingFeature(String),
    EnableExperimentalFeature(String),
    InteroperabilityMode(String),
}

impl SettingKind {
    fn from_parts(name: &str, value: Value) -> Result<Self> {
        let single = |value: Value| -> Result<String> {
            match value {
                Value::String(s) => Ok(s),
                Value::Array(mut items) if items.len() == 1 => match items.remove(0) {
                    Value::String(s) => Ok(s),
                    other => Err(ManifestError::Invalid {
                        detail: format!("setting '{name}' has non-string value {other}"),
                    }),
                },
                other => Err(ManifestError::Invalid {
                    detail: format!("setting '{name}' has unexpected value {other}"),
                }),
            }
        };

        Ok(match name {
            "define" => SettingKind::Define(single(value)?),
            "headerSearchPath" => SettingKind::HeaderSearchPath(single(value)?),
            "unsafeFlags" => SettingKind::UnsafeFlags(serde_json::from_value(value)?),
            "linkedLibrary" => SettingKind::LinkedLibrary(single(value)?),
            "linkedFramework" => SettingKind::LinkedFramework(single(value)?),
            "enableUpcomingFeature" => SettingKind::EnableUpcomingFeature(single(value)?),
            "enableExperimentalFeature" => SettingKind::EnableExperimentalFeature(single(value)?),
            "interoperabilityMode" => SettingKind::InteroperabilityMode(single(value)?),
            other => {
                return Err(ManifestError::Unsupported {
                    what: format!("build setting '{other}'"),
                })
            }
        })
    }

    fn name(&self) -> &'static str {
        match self {
            SettingKind::Define(_) => "define",
            SettingKind::HeaderSearchPath(_) => "headerSearchPath",
            SettingKind::UnsafeFlags(_) => "unsafeFlags",
            SettingKind::LinkedLibrary(_) => "linkedLibrary",
            SettingKind::LinkedFramework(_) => "linkedFramework",
            SettingKind::EnableUpcomingFeature(_) => "enableUpcomingFeature",
            SettingKind::EnableExperimentalFeature(_) => "enableExperimentalFeature",
            SettingKind::InteroperabilityMode(_) => "interoperabilityMode",
        }
    }

    fn value(&self) -> Value {
        match self {
            SettingKind::UnsafeFlags(flags) => {
                Value::Array(flags.iter().cloned().map(Value::String).collect())
            }
            SettingKind::Define(v)
            | SettingKind::HeaderSearchPath(v)
            | SettingKind::LinkedLibrary(v)
            | SettingKind::LinkedFramework(v)
            | SettingKind::EnableUpcomingFeature(v)
            | SettingKind::EnableExperimentalFeature(v)
            | SettingKind::InteroperabilityMode(v) => Value::String(v.clone()),
        }
    }
}

/// Toolchains from 5.9 write `{"kind": {"define": {"_0": "X"}}}`; older ones
/// write `{"name": "define", "value": ["X"]}`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSetting {
    Keyed {
        tool: SettingTool,
        kind: BTreeMap<String, BTreeMap<String, Value>>,
        #[serde(default)]
        condition: Option<Condition>,
    },
    Named {
        tool: SettingTool,
        name: String,
        #[serde(default)]
        value: Value,
        #[serde(default)]
        condition: Option<Condition>,
    },
}

impl TryFrom<RawSetting> for TargetSetting {
    type Error = ManifestError;

    fn try_from(raw: RawSetting) -> Result<Self> {
        match raw {
            RawSetting::Keyed {
                tool,
                kind,
                condition,
            } => {
                let (name, mut payload) =
                    kind.into_iter().next().ok_or_else(|| ManifestError::Invalid {
                        detail: "build setting without a kind".to_string(),
                    })?;
                let value = payload.remove("_0").unwrap_or(Value::Null);
                Ok(TargetSetting {
                    tool,
                    kind: SettingKind::from_parts(&name, value)?,
                    condition,
                })
            }
            RawSetting::Named {
                tool,
                name,
                value,
                condition,
            } => Ok(TargetSetting {
                tool,
                kind: SettingKind::from_parts(&name, value)?,
                condition,
            }),
        }
    }
}

impl From<TargetSetting> for RawSetting {
    fn from(setting: TargetSetting) -> Self {
        let mut payload = BTreeMap::new();
        payload.insert("_0".to_string(), setting.kind.value());
        let mut kind = BTreeMap::new();
        kind.insert(setting.kind.name().to_string(), payload);
        RawSetting::Keyed {
            tool: setting.tool,
            kind,
            condition: setting.condition,
        }
    }
}

/// System library providers (`.brew(["openssl"])`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemPackageProvider {
    Brew((Vec<String>,)),
    Apt((Vec<String>,)),
    Yum((Vec<String>,)),
    Nuget((Vec<String>,)),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PluginCapability {
    BuildTool(EmptyRule),
    Command(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PluginUsage {
    Plugin((String, Option<String>)),
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Trimmed dump-package output for a package with three products.
    pub const WIDGETS_DUMP: &str = r#"{
  "cLanguageStandard": null,
  "cxxLanguageStandard": "gnu++17",
  "defaultLocalization": "en",
  "dependencies": [
    {
      "sourceControl": [
        {
          "identity": "swift-collections",
          "location": { "remote": [ { "urlString": "https://github.com/apple/swift-collections.git" } ] },
          "productFilter": null,
          "requirement": { "range": [ { "lowerBound": "1.0.0", "upperBound": "2.0.0" } ] }
        }
      ]
    },
    {
      "fileSystem": [
        { "identity": "shared", "path": "/src/Shared", "productFilter": null }
      ]
    }
  ],
  "name": "Widgets",
  "packageKind": { "root": [ "/src/Widgets" ] },
  "pkgConfig": null,
  "platforms": [
    { "options": [], "platformName": "ios", "version": "13.0" },
    { "options": [], "platformName": "macos", "version": "11.0" }
  ],
  "products": [
    { "name": "Widgets", "settings": [], "targets": [ "Widgets" ], "type": { "library": [ "automatic" ] } },
    { "name": "WidgetsKit", "settings": [], "targets": [ "WidgetsKit", "Widgets" ], "type": { "library": [ "static" ] } },
    { "name": "widgets-cli", "settings": [], "targets": [ "WidgetsCLI" ], "type": { "executable": null } }
  ],
  "providers": null,
  "swiftLanguageVersions": [ "5" ],
  "targets": [
    {
      "dependencies": [
        { "product": [ "Collections", "swift-collections", null, null ] },
        { "byName": [ "Shared", { "platformNames": [ "ios" ], "config": null } ] }
      ],
      "exclude": [ "Info.plist" ],
      "name": "Widgets",
      "packageAccess": true,
      "resources": [ { "path": "Assets", "rule": { "process": {} } } ],
      "settings": [
        { "tool": "swift", "kind": { "define": { "_0": "WIDGETS" } }, "condition": { "platformNames": [], "config": "debug" } },
        { "tool": "linker", "kind": { "linkedFramework": { "_0": "UIKit" } }, "condition": { "platformNames": [ "ios" ] } }
      ],
      "type": "regular"
    },
    {
      "dependencies": [ { "target": [ "Widgets", null ] } ],
      "exclude": [],
      "name": "WidgetsKit",
      "path": "Sources/Kit",
      "resources": [],
      "settings": [ { "tool": "c", "name": "headerSearchPath", "value": [ "include" ], "condition": null } ],
      "type": "regular"
    },
    {
      "dependencies": [ { "byName": [ "Widgets", null ] } ],
      "exclude": [],
      "name": "WidgetsCLI",
      "resources": [],
      "settings": [],
      "type": "executable"
    },
    {
      "dependencies": [ { "byName": [ "Widgets", null ] } ],
      "exclude": [],
      "name": "WidgetsTests",
      "resources": [],
      "settings": [],
      "type": "test"
    }
  ],
  "toolsVersion": { "_version": "5.7.0" }
}"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::WIDGETS_DUMP;
    use super::*;

    #[test]
    fn parse_dump_package_output() {
        let m = Manifest::from_dump_json(WIDGETS_DUMP, "/src/Widgets/Package.swift").unwrap();
        assert_eq!(m.name, "Widgets");
        assert_eq!(m.path, PathBuf::from("/src/Widgets/Package.swift"));
        assert_eq!(m.tools_version.header(), "5.7");
        assert_eq!(m.platforms.len(), 2);
        assert_eq!(m.product_names(), vec!["Widgets", "WidgetsKit", "widgets-cli"]);
        assert_eq!(m.dependencies.len(), 2);
        assert_eq!(m.targets.len(), 4);
        assert_eq!(m.default_localization.as_deref(), Some("en"));
    }

    #[test]
    fn product_kinds_decode() {
        let m = Manifest::from_dump_json(WIDGETS_DUMP, "Package.swift").unwrap();
        assert_eq!(
            m.product("Widgets").unwrap().kind.linkage(),
            Some(LibraryLinkage::Automatic)
        );
        assert_eq!(
            m.product("WidgetsKit").unwrap().kind.linkage(),
            Some(LibraryLinkage::Static)
        );
        assert_eq!(m.product("widgets-cli").unwrap().kind, ProductType::Executable(()));
    }

    #[test]
    fn target_dependencies_decode_positionally() {
        let m = Manifest::from_dump_json(WIDGETS_DUMP, "Package.swift").unwrap();
        let deps = &m.targets[0].dependencies;
        assert_eq!(
            deps[0],
            TargetDependency::Product {
                name: "Collections".into(),
                package: Some("swift-collections".into()),
                module_aliases: None,
                condition: None,
            }
        );
        match &deps[1] {
            TargetDependency::ByName { name, condition } => {
                assert_eq!(name, "Shared");
                assert_eq!(condition.as_ref().unwrap().platform_names, vec!["ios"]);
            }
            other => panic!("unexpected dependency {other:?}"),
        }
    }

    #[test]
    fn both_setting_encodings_decode() {
        let m = Manifest::from_dump_json(WIDGETS_DUMP, "Package.swift").unwrap();
        let keyed = &m.targets[0].settings[0];
        assert_eq!(keyed.tool, SettingTool::Swift);
        assert_eq!(keyed.kind, SettingKind::Define("WIDGETS".into()));

        let named = &m.targets[1].settings[0];
        assert_eq!(named.tool, SettingTool::C);
        assert_eq!(named.kind, SettingKind::HeaderSearchPath("include".into()));
    }

    #[test]
    fn json_round_trip_preserves_model() {
        let m = Manifest::from_dump_json(WIDGETS_DUMP, "Package.swift").unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back = Manifest::from_dump_json(&json, "Package.swift").unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn reject_empty_name() {
        let json = r#"{"name": " ", "toolsVersion": {"_version": "5.9.0"}}"#;
        assert!(matches!(
            Manifest::from_dump_json(json, "Package.swift"),
            Err(ManifestError::Invalid { .. })
        ));
    }

    #[test]
    fn reject_malformed_json() {
        assert!(matches!(
            Manifest::from_dump_json("error: no Package.swift", "Package.swift"),
            Err(ManifestError::Json(_))
        ));
    }
}
