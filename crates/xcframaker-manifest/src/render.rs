//! `Package.swift` source generation.
//!
//! Arguments are emitted in the order the PackageDescription initializers
//! declare them; Swift rejects labelled arguments out of order.

use crate::error::{ManifestError, Result};
use crate::model::{
    Condition, LibraryLinkage, Manifest, PackageDependency, PluginCapability, PluginUsage,
    Product, ProductType, Requirement, Resource, ResourceRule, SettingKind, SettingTool,
    SupportedPlatform, SystemPackageProvider, Target, TargetDependency, TargetKind,
    TargetSetting,
};

impl Manifest {
    /// Render the manifest as `Package.swift` source.
    pub fn render(&self) -> Result<String> {
        let mut args = vec![format!("name: {}", quote(&self.name))];

        if let Some(loc) = &self.default_localization {
            args.push(format!("defaultLocalization: {}", quote(loc)));
        }
        if !self.platforms.is_empty() {
            let items = self
                .platforms
                .iter()
                .map(render_supported_platform)
                .collect::<Result<Vec<_>>>()?;
            args.push(format!("platforms: {}", block_list(&items, 4)));
        }
        if let Some(pkg_config) = &self.pkg_config {
            args.push(format!("pkgConfig: {}", quote(pkg_config)));
        }
        if let Some(providers) = &self.providers {
            args.push(format!("providers: {}", render_providers(providers)));
        }

        let products = self
            .products
            .iter()
            .map(render_product)
            .collect::<Result<Vec<_>>>()?;
        args.push(format!("products: {}", block_list(&products, 4)));

        let dependencies = self
            .dependencies
            .iter()
            .map(render_package_dependency)
            .collect::<Result<Vec<_>>>()?;
        args.push(format!("dependencies: {}", block_list(&dependencies, 4)));

        let targets = self
            .targets
            .iter()
            .map(render_target)
            .collect::<Result<Vec<_>>>()?;
        args.push(format!("targets: {}", block_list(&targets, 4)));

        if let Some(versions) = &self.swift_language_versions {
            let label = if self.tools_version.major() >= 6 {
                "swiftLanguageModes"
            } else {
                "swiftLanguageVersions"
            };
            let items: Vec<_> = versions
                .iter()
                .map(|v| format!(".version({})", quote(v)))
                .collect();
            args.push(format!("{label}: {}", inline_list(&items)));
        }
        if let Some(standard) = &self.c_language_standard {
            args.push(format!("cLanguageStandard: .{}", c_standard_case(standard)?));
        }
        if let Some(standard) = &self.cxx_language_standard {
            args.push(format!("cxxLanguageStandard: .{}", cxx_standard_case(standard)?));
        }

        let mut out = String::new();
        out.push_str(&format!(
            "// swift-tools-version:{}\n",
            self.tools_version.header()
        ));
        out.push_str("import PackageDescription\n\n");
        out.push_str("let package = Package(\n");
        out.push_str(&indent_args(&args, 4));
        out.push_str("\n)\n");
        Ok(out)
    }
}

fn unsupported(what: impl Into<String>) -> ManifestError {
    ManifestError::Unsupported { what: what.into() }
}

/// Swift string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<_> = items.iter().map(|s| quote(s)).collect();
    inline_list(&quoted)
}

fn inline_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

/// One element per line; `indent` is the column of the closing bracket.
fn block_list(items: &[String], indent: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let pad = " ".repeat(indent + 4);
    let mut out = String::from("[\n");
    for item in items {
        out.push_str(&pad);
        out.push_str(item);
        out.push_str(",\n");
    }
    out.push_str(&" ".repeat(indent));
    out.push(']');
    out
}

fn indent_args(args: &[String], indent: usize) -> String {
    let pad = " ".repeat(indent);
    args.iter()
        .map(|a| format!("{pad}{a}"))
        .collect::<Vec<_>>()
        .join(",\n")
}

fn platform_case(name: &str) -> Option<&'static str> {
    Some(match name {
        "ios" => "iOS",
        "macos" => "macOS",
        "maccatalyst" => "macCatalyst",
        "tvos" => "tvOS",
        "watchos" => "watchOS",
        "visionos" => "visionOS",
        "driverkit" => "driverKit",
        "linux" => "linux",
        "windows" => "windows",
        "android" => "android",
        "wasi" => "wasi",
        "openbsd" => "openbsd",
        _ => return None,
    })
}

fn render_supported_platform(p: &SupportedPlatform) -> Result<String> {
    let case = match p.platform_name.as_str() {
        "ios" | "macos" | "maccatalyst" | "tvos" | "watchos" | "visionos" | "driverkit" => {
            platform_case(&p.platform_name)
        }
        _ => None,
    }
    .ok_or_else(|| unsupported(format!("deployment platform '{}'", p.platform_name)))?;

    if !p.options.is_empty() {
        return Err(unsupported(format!("options on platform '{}'", p.platform_name)));
    }
    let version = p
        .version
        .as_deref()
        .ok_or_else(|| unsupported(format!("platform '{}' without a version", p.platform_name)))?;
    Ok(format!(".{case}({})", quote(version)))
}

fn render_condition(condition: &Condition) -> Result<String> {
    let mut parts = Vec::new();
    if !condition.platform_names.is_empty() {
        let platforms = condition
            .platform_names
            .iter()
            .map(|name| {
                platform_case(name)
                    .map(|case| format!(".{case}"))
                    .ok_or_else(|| unsupported(format!("condition platform '{name}'")))
            })
            .collect::<Result<Vec<_>>>()?;
        parts.push(format!("platforms: {}", inline_list(&platforms)));
    }
    if let Some(config) = &condition.config {
        match config.as_str() {
            "debug" | "release" => parts.push(format!("configuration: .{config}")),
            other => return Err(unsupported(format!("build configuration '{other}'"))),
        }
    }
    Ok(format!(".when({})", parts.join(", ")))
}

fn render_optional_condition(condition: &Option<Condition>) -> Result<Option<String>> {
    match condition {
        Some(c) if !c.is_empty() => Ok(Some(render_condition(c)?)),
        _ => Ok(None),
    }
}

fn render_providers(providers: &[SystemPackageProvider]) -> String {
    let items: Vec<_> = providers
        .iter()
        .map(|p| match p {
            SystemPackageProvider::Brew((pkgs,)) => format!(".brew({})", quoted_list(pkgs)),
            SystemPackageProvider::Apt((pkgs,)) => format!(".apt({})", quoted_list(pkgs)),
            SystemPackageProvider::Yum((pkgs,)) => format!(".yum({})", quoted_list(pkgs)),
            SystemPackageProvider::Nuget((pkgs,)) => format!(".nuget({})", quoted_list(pkgs)),
        })
        .collect();
    inline_list(&items)
}

fn render_product(product: &Product) -> Result<String> {
    let name = quote(&product.name);
    let targets = quoted_list(&product.targets);
    match &product.kind {
        ProductType::Library((LibraryLinkage::Automatic,)) => {
            Ok(format!(".library(name: {name}, targets: {targets})"))
        }
        ProductType::Library((LibraryLinkage::Static,)) => Ok(format!(
            ".library(name: {name}, type: .static, targets: {targets})"
        )),
        ProductType::Library((LibraryLinkage::Dynamic,)) => Ok(format!(
            ".library(name: {name}, type: .dynamic, targets: {targets})"
        )),
        ProductType::Executable(()) => Ok(format!(".executable(name: {name}, targets: {targets})")),
        ProductType::Plugin(()) => Ok(format!(".plugin(name: {name}, targets: {targets})")),
        other => Err(unsupported(format!(
            "product '{}' ({} product)",
            product.name,
            other.describe()
        ))),
    }
}

/// `"1.2.0"..<"2.0.0"` is what `from: "1.2.0"` expands to.
fn is_next_major(lower: &str, upper: &str) -> bool {
    match (semver::Version::parse(lower), semver::Version::parse(upper)) {
        (Ok(lo), Ok(hi)) => hi == semver::Version::new(lo.major + 1, 0, 0),
        _ => false,
    }
}

fn render_requirement(requirement: &Requirement) -> String {
    match requirement {
        Requirement::Range((range,)) if is_next_major(&range.lower_bound, &range.upper_bound) => {
            format!("from: {}", quote(&range.lower_bound))
        }
        Requirement::Range((range,)) => {
            format!("{}..<{}", quote(&range.lower_bound), quote(&range.upper_bound))
        }
        Requirement::Exact((version,)) => format!("exact: {}", quote(version)),
        Requirement::Branch((branch,)) => format!("branch: {}", quote(branch)),
        Requirement::Revision((revision,)) => format!("revision: {}", quote(revision)),
    }
}

fn render_package_dependency(dep: &PackageDependency) -> Result<String> {
    match dep {
        PackageDependency::SourceControl((sc,)) => Ok(format!(
            ".package(url: {}, {})",
            quote(sc.location.as_str()),
            render_requirement(&sc.requirement)
        )),
        PackageDependency::FileSystem((fs,)) => Ok(format!(".package(path: {})", quote(&fs.path))),
        PackageDependency::Registry((reg,)) => match &reg.requirement {
            Requirement::Branch(_) | Requirement::Revision(_) => Err(unsupported(format!(
                "branch/revision requirement on registry package '{}'",
                reg.identity
            ))),
            req => Ok(format!(
                ".package(id: {}, {})",
                quote(&reg.identity),
                render_requirement(req)
            )),
        },
    }
}

fn render_target_dependency(dep: &TargetDependency) -> Result<String> {
    match dep {
        TargetDependency::ByName { name, condition } => {
            match render_optional_condition(condition)? {
                Some(cond) => Ok(format!(".byName(name: {}, condition: {cond})", quote(name))),
                None => Ok(quote(name)),
            }
        }
        TargetDependency::Target { name, condition } => {
            let mut args = vec![format!("name: {}", quote(name))];
            if let Some(cond) = render_optional_condition(condition)? {
                args.push(format!("condition: {cond}"));
            }
            Ok(format!(".target({})", args.join(", ")))
        }
        TargetDependency::Product {
            name,
            package,
            module_aliases,
            condition,
        } => {
            let mut args = vec![format!("name: {}", quote(name))];
            if let Some(package) = package {
                args.push(format!("package: {}", quote(package)));
            }
            if let Some(aliases) = module_aliases.as_ref().filter(|a| !a.is_empty()) {
                let pairs: Vec<_> = aliases
                    .iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), quote(v)))
                    .collect();
                args.push(format!("moduleAliases: {}", inline_list(&pairs)));
            }
            if let Some(cond) = render_optional_condition(condition)? {
                args.push(format!("condition: {cond}"));
            }
            Ok(format!(".product({})", args.join(", ")))
        }
    }
}

fn render_resource(resource: &Resource) -> String {
    let path = quote(&resource.path);
    match &resource.rule {
        ResourceRule::Process(rule) => match &rule.localization {
            Some(loc) => format!(".process({path}, localization: .{loc})"),
            None => format!(".process({path})"),
        },
        ResourceRule::Copy(_) => format!(".copy({path})"),
        ResourceRule::EmbedInCode(_) => format!(".embedInCode({path})"),
    }
}

fn render_setting(setting: &TargetSetting) -> Result<String> {
    let mut args = match (&setting.kind, setting.tool) {
        (SettingKind::Define(define), SettingTool::C | SettingTool::Cxx) => {
            match define.split_once('=') {
                Some((name, value)) => vec![quote(name), format!("to: {}", quote(value))],
                None => vec![quote(define)],
            }
        }
        (SettingKind::Define(define), _) => vec![quote(define)],
        (SettingKind::UnsafeFlags(flags), _) => vec![quoted_list(flags)],
        (SettingKind::InteroperabilityMode(mode), _) => vec![format!(".{mode}")],
        (
            SettingKind::HeaderSearchPath(v)
            | SettingKind::LinkedLibrary(v)
            | SettingKind::LinkedFramework(v)
            | SettingKind::EnableUpcomingFeature(v)
            | SettingKind::EnableExperimentalFeature(v),
            _,
        ) => vec![quote(v)],
    };
    if let Some(cond) = render_optional_condition(&setting.condition)? {
        args.push(cond);
    }

    let function = match &setting.kind {
        SettingKind::Define(_) => "define",
        SettingKind::HeaderSearchPath(_) => "headerSearchPath",
        SettingKind::UnsafeFlags(_) => "unsafeFlags",
        SettingKind::LinkedLibrary(_) => "linkedLibrary",
        SettingKind::LinkedFramework(_) => "linkedFramework",
        SettingKind::EnableUpcomingFeature(_) => "enableUpcomingFeature",
        SettingKind::EnableExperimentalFeature(_) => "enableExperimentalFeature",
        SettingKind::InteroperabilityMode(_) => "interoperabilityMode",
    };
    Ok(format!(".{function}({})", args.join(", ")))
}

/// Settings grouped into `cSettings:`, `cxxSettings:`, ... arguments.
fn render_settings(target: &Target, allowed: &[SettingTool]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for (tool, label) in [
        (SettingTool::C, "cSettings"),
        (SettingTool::Cxx, "cxxSettings"),
        (SettingTool::Swift, "swiftSettings"),
        (SettingTool::Linker, "linkerSettings"),
    ] {
        let items = target
            .settings
            .iter()
            .filter(|s| s.tool == tool)
            .map(render_setting)
            .collect::<Result<Vec<_>>>()?;
        if items.is_empty() {
            continue;
        }
        if !allowed.contains(&tool) {
            return Err(unsupported(format!("{label} on target '{}'", target.name)));
        }
        out.push(format!("{label}: {}", inline_list(&items)));
    }
    Ok(out)
}

fn render_plugin_usages(usages: &[PluginUsage]) -> String {
    let items: Vec<_> = usages
        .iter()
        .map(|usage| match usage {
            PluginUsage::Plugin((name, Some(package))) => {
                format!(".plugin(name: {}, package: {})", quote(name), quote(package))
            }
            PluginUsage::Plugin((name, None)) => format!(".plugin(name: {})", quote(name)),
        })
        .collect();
    inline_list(&items)
}

fn render_target(target: &Target) -> Result<String> {
    let mut args = vec![format!("name: {}", quote(&target.name))];

    let push_dependencies = |args: &mut Vec<String>| -> Result<()> {
        if !target.dependencies.is_empty() {
            let deps = target
                .dependencies
                .iter()
                .map(render_target_dependency)
                .collect::<Result<Vec<_>>>()?;
            args.push(format!("dependencies: {}", inline_list(&deps)));
        }
        Ok(())
    };
    let push_layout = |args: &mut Vec<String>| {
        if let Some(path) = &target.path {
            args.push(format!("path: {}", quote(path)));
        }
        if !target.exclude.is_empty() {
            args.push(format!("exclude: {}", quoted_list(&target.exclude)));
        }
        if let Some(sources) = &target.sources {
            args.push(format!("sources: {}", quoted_list(sources)));
        }
    };
    let plugins = target
        .plugin_usages
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|u| format!("plugins: {}", render_plugin_usages(u)));

    let function = match target.kind {
        TargetKind::Regular | TargetKind::Executable | TargetKind::Test => {
            push_dependencies(&mut args)?;
            push_layout(&mut args);
            if !target.resources.is_empty() {
                let items: Vec<_> = target.resources.iter().map(render_resource).collect();
                args.push(format!("resources: {}", inline_list(&items)));
            }
            if target.kind != TargetKind::Test {
                if let Some(headers) = &target.public_headers_path {
                    args.push(format!("publicHeadersPath: {}", quote(headers)));
                }
            }
            args.extend(render_settings(
                target,
                &[SettingTool::C, SettingTool::Cxx, SettingTool::Swift, SettingTool::Linker],
            )?);
            args.extend(plugins);
            match target.kind {
                TargetKind::Regular => "target",
                TargetKind::Executable => "executableTarget",
                _ => "testTarget",
            }
        }
        TargetKind::Macro => {
            push_dependencies(&mut args)?;
            push_layout(&mut args);
            args.extend(render_settings(target, &[SettingTool::Swift, SettingTool::Linker])?);
            args.extend(plugins);
            "macro"
        }
        TargetKind::System => {
            if let Some(path) = &target.path {
                args.push(format!("path: {}", quote(path)));
            }
            if let Some(pkg_config) = &target.pkg_config {
                args.push(format!("pkgConfig: {}", quote(pkg_config)));
            }
            if let Some(providers) = &target.providers {
                args.push(format!("providers: {}", render_providers(providers)));
            }
            "systemLibrary"
        }
        TargetKind::Binary => {
            match (&target.path, &target.url, &target.checksum) {
                (Some(path), _, _) => args.push(format!("path: {}", quote(path))),
                (None, Some(url), Some(checksum)) => {
                    args.push(format!("url: {}", quote(url)));
                    args.push(format!("checksum: {}", quote(checksum)));
                }
                _ => {
                    return Err(unsupported(format!(
                        "binary target '{}' without path or url/checksum",
                        target.name
                    )))
                }
            }
            "binaryTarget"
        }
        TargetKind::Plugin => {
            match &target.plugin_capability {
                Some(PluginCapability::BuildTool(_)) => args.push("capability: .buildTool()".into()),
                _ => {
                    return Err(unsupported(format!(
                        "capability of plugin target '{}'",
                        target.name
                    )))
                }
            }
            push_dependencies(&mut args)?;
            push_layout(&mut args);
            "plugin"
        }
    };

    Ok(format!(".{function}({})", args.join(", ")))
}

fn c_standard_case(raw: &str) -> Result<String> {
    let valid = raw.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && raw.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(raw.to_string())
    } else {
        Err(unsupported(format!("C language standard '{raw}'")))
    }
}

fn cxx_standard_case(raw: &str) -> Result<String> {
    let case = if let Some(rest) = raw.strip_prefix("gnu++") {
        format!("gnucxx{rest}")
    } else if let Some(rest) = raw.strip_prefix("c++") {
        format!("cxx{rest}")
    } else {
        return Err(unsupported(format!("C++ language standard '{raw}'")));
    };
    c_standard_case(&case).map_err(|_| unsupported(format!("C++ language standard '{raw}'")))
}
