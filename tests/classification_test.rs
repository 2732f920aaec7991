//! Classification of on-disk projects
//!
//! Runs the default registry over the fixture projects under
//! `tests/fixtures/` and over synthetic projects in temporary directories.

use pipeforge::stack::{BuildSystemId, EcosystemDetails, LanguageId};
use pipeforge::generate::GenerationContext;
use pipeforge::{EcosystemId, EcosystemRegistry, PipeforgeError, ProjectFiles};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use yare::parameterized;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn classify(root: &Path) -> (EcosystemId, pipeforge::ProjectDescriptor) {
    EcosystemRegistry::with_defaults()
        .classify(root, None)
        .unwrap()
}

#[parameterized(
    python_flask = { "python-flask", EcosystemId::Python, Some("flask"), "3.12", "pytest" },
    python_poetry = { "python-poetry", EcosystemId::Python, Some("fastapi"), "3.10", "pytest" },
    node_express = { "node-express", EcosystemId::Node, Some("express"), "18", "jest" },
    maven_spring = { "maven-spring", EcosystemId::Maven, Some("spring-boot"), "21", "junit5" },
    gradle_kotlin = { "gradle-kotlin", EcosystemId::Gradle, None, "17", "testng" },
    plain_java = { "plain-java", EcosystemId::Java, None, "8", "junit5" },
    dotnet_web = { "dotnet-web", EcosystemId::DotNet, Some("aspnetcore"), "8.0", "xunit" },
)]
fn test_fixture_classification(
    name: &str,
    ecosystem: EcosystemId,
    framework: Option<&str>,
    version: &str,
    test_framework: &str,
) {
    let (id, descriptor) = classify(&fixture(name));

    assert_eq!(id, ecosystem);
    assert_eq!(descriptor.ecosystem(), ecosystem);
    assert_eq!(descriptor.framework.as_deref(), framework);
    assert_eq!(descriptor.runtime_version, version);
    assert_eq!(descriptor.test_framework, test_framework);
    assert!(descriptor.project_path.as_deref().unwrap().is_absolute());
}

#[test]
fn test_fixture_details() {
    let (_, descriptor) = classify(&fixture("python-poetry"));
    assert_eq!(descriptor.package_manager(), Some(BuildSystemId::Poetry));

    let (_, descriptor) = classify(&fixture("node-express"));
    assert_eq!(descriptor.package_manager(), Some(BuildSystemId::Yarn));

    let (_, descriptor) = classify(&fixture("gradle-kotlin"));
    assert_eq!(
        descriptor.details,
        EcosystemDetails::Gradle {
            build_tool: BuildSystemId::Gradle,
            uses_kotlin_dsl: true,
            is_multi_project: true,
            packaging: "war".to_string(),
        }
    );

    let (_, descriptor) = classify(&fixture("dotnet-web"));
    assert_eq!(
        descriptor.details,
        EcosystemDetails::DotNet {
            project_type: "web".to_string(),
            has_solution: true,
            is_web_app: true,
        }
    );
}

#[parameterized(
    requirements = { "requirements.txt", EcosystemId::Python },
    pyproject = { "pyproject.toml", EcosystemId::Python },
    package_json = { "package.json", EcosystemId::Node },
    pom = { "pom.xml", EcosystemId::Maven },
    groovy_gradle = { "build.gradle", EcosystemId::Gradle },
    kotlin_gradle = { "build.gradle.kts", EcosystemId::Gradle },
    java_source = { "Main.java", EcosystemId::Java },
    csproj = { "App.csproj", EcosystemId::DotNet },
    solution = { "App.sln", EcosystemId::DotNet },
)]
fn test_minimal_gate(file: &str, expected: EcosystemId) {
    let dir = TempDir::new().unwrap();
    write(dir.path(), file, "");

    let (id, _) = classify(dir.path());
    assert_eq!(id, expected);
}

#[test]
fn test_empty_manifests_use_defaults() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "requirements.txt", "");

    let (_, descriptor) = classify(dir.path());
    assert_eq!(descriptor.language, LanguageId::Python);
    assert_eq!(descriptor.runtime_version, "3.11");
    assert_eq!(descriptor.framework, None);
    assert_eq!(descriptor.package_manager(), Some(BuildSystemId::Pip));
}

#[test]
fn test_python_wins_over_node_in_registry_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "requirements.txt", "django==4.2\n");
    write(dir.path(), "package.json", r#"{"dependencies": {"react": "18"}}"#);

    let (id, descriptor) = classify(dir.path());
    assert_eq!(id, EcosystemId::Python);
    assert_eq!(descriptor.framework.as_deref(), Some("django"));
}

#[test]
fn test_stray_script_next_to_pom_is_maven() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pom.xml", "<project/>");
    write(dir.path(), "scripts/release.py", "print('release')\n");

    let (id, _) = classify(dir.path());
    assert_eq!(id, EcosystemId::Maven);
}

#[test]
fn test_forced_ecosystem() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "requirements.txt", "");
    write(dir.path(), "package.json", "{}");

    let registry = EcosystemRegistry::with_defaults();
    let (id, _) = registry.classify(dir.path(), Some("Node")).unwrap();
    assert_eq!(id, EcosystemId::Node);

    let err = registry.classify(dir.path(), Some("maven")).unwrap_err();
    assert!(matches!(err, PipeforgeError::NoEcosystemDetected { .. }));
}

#[test]
fn test_unknown_forced_ecosystem_fails_first() {
    let err = EcosystemRegistry::with_defaults()
        .classify(Path::new("/definitely/not/here"), Some("ruby"))
        .unwrap_err();
    match err {
        PipeforgeError::UnknownEcosystem { name, .. } => assert_eq!(name, "ruby"),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_parent_components_resolve_to_named_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "shop/requirements.txt", "flask==2.3.0\n");
    fs::create_dir_all(dir.path().join("shop/sub")).unwrap();

    let registry = EcosystemRegistry::with_defaults();
    let (id, descriptor) = registry
        .classify(&dir.path().join("shop/sub/.."), None)
        .unwrap();
    let root = descriptor.project_path.clone().unwrap();
    assert!(root.ends_with("shop"), "{}", root.display());

    let context = GenerationContext::build(
        registry.get(id).unwrap(),
        &descriptor,
        &ProjectFiles::on_disk(root),
    );
    assert_eq!(context.project_name(), "shop");
}

#[test]
fn test_empty_directory_is_not_classified() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "README.md", "# notes\n");

    let err = EcosystemRegistry::with_defaults()
        .classify(dir.path(), None)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("No supported ecosystem detected"));
    assert!(message.contains("python, node, maven, gradle, java, dotnet"));
}

#[test]
fn test_missing_directory_is_not_classified() {
    let dir = TempDir::new().unwrap();
    let err = EcosystemRegistry::with_defaults()
        .classify(&dir.path().join("gone"), None)
        .unwrap_err();
    assert!(matches!(err, PipeforgeError::NoEcosystemDetected { .. }));
}

#[test]
fn test_non_utf8_manifest_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("requirements.txt"), [0xff, 0xfe, 0x00, 0x66]).unwrap();

    let (id, descriptor) = classify(dir.path());
    assert_eq!(id, EcosystemId::Python);
    assert_eq!(descriptor.framework, None);
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_does_not_break_classification() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.py", "print('hi')\n");
    std::os::unix::fs::symlink(dir.path(), dir.path().join("src/loop")).unwrap();

    let (id, _) = classify(dir.path());
    assert_eq!(id, EcosystemId::Python);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "package.json", r#"{"dependencies": {"koa": "2"}}"#);
    write(dir.path(), ".nvmrc", "18.19.0\n");
    let nvmrc = dir.path().join(".nvmrc");
    fs::set_permissions(&nvmrc, fs::Permissions::from_mode(0o000)).unwrap();

    let (id, descriptor) = classify(dir.path());
    assert_eq!(id, EcosystemId::Node);
    assert_eq!(descriptor.framework.as_deref(), Some("koa"));
    // root can still read it; anyone else falls back to the default
    assert!(["18.19", "20"].contains(&descriptor.runtime_version.as_str()));

    fs::set_permissions(&nvmrc, fs::Permissions::from_mode(0o644)).unwrap();
}
