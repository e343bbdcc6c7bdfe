use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use shieldgen_core::{ErrorKind, MarkupTypeExtractor, ProjectDescriptor};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn extracts_code_behind_and_alias_usages_for_a_project() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Shell");
    write(&root, "Shell.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\" />");
    write(
        &root,
        "MainWindow.xaml",
        r#"<Window x:Class="Shell.MainWindow"
        xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation"
        xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml"
        xmlns:local="clr-namespace:Shell.Controls"
        xmlns:sys="clr-namespace:System;assembly=mscorlib">
    <Window.Resources>
        <local:BoolToVisibility x:Key="b2v" />
        <sys:Double x:Key="width">120</sys:Double>
    </Window.Resources>
    <local:Sidebar />
</Window>
"#,
    );
    write(
        &root,
        "MainWindow.xaml.cs",
        "using System.Windows;\n\nnamespace Shell\n{\n    public partial class MainWindow : Window\n    {\n    }\n}\n",
    );
    write(
        &root,
        "Themes/Generic.xaml",
        r#"<ResourceDictionary xmlns:local="clr-namespace:Shell.Controls">
    <Style TargetType="{x:Type local:Sidebar}" />
</ResourceDictionary>
"#,
    );

    let project = ProjectDescriptor::load(&root.join("Shell.csproj")).unwrap();
    let shielded = MarkupTypeExtractor::new().extract_project(&project).unwrap();
    assert_eq!(
        shielded,
        set(&[
            "Shell.Controls.BoolToVisibility",
            "Shell.Controls.Sidebar",
            "Shell.MainWindow",
        ])
    );
}

#[test]
fn project_without_markup_has_no_shielded_types() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Core/Core.csproj", "<Project />");
    write(dir.path(), "Core/Service.cs", "namespace Core { class Service {} }");

    let project = ProjectDescriptor::load(&dir.path().join("Core/Core.csproj")).unwrap();
    assert!(
        MarkupTypeExtractor::new()
            .extract_project(&project)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn extraction_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Ui/Ui.csproj", "<Project />");
    write(
        dir.path(),
        "Ui/Panel.xaml",
        r#"<UserControl xmlns:vm="clr-namespace:Ui.ViewModels"><vm:PanelModel /></UserControl>"#,
    );
    write(dir.path(), "Ui/Panel.xaml.cs", "namespace Ui.Views;\npartial class Panel {}\n");

    let project = ProjectDescriptor::load(&dir.path().join("Ui/Ui.csproj")).unwrap();
    let extractor = MarkupTypeExtractor::new();
    let first = extractor.extract_project(&project).unwrap();
    let second = extractor.extract_project(&project).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, set(&["Ui.ViewModels.PanelModel", "Ui.Views.Panel"]));
}

#[cfg(unix)]
#[test]
fn unreadable_code_behind_propagates() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Ui/Ui.csproj", "<Project />");
    write(dir.path(), "Ui/Panel.xaml", "<UserControl />");
    // A directory where the code-behind should be makes the read fail with something other than NotFound.
    fs::create_dir_all(dir.path().join("Ui/Panel.xaml.cs")).unwrap();

    let err = MarkupTypeExtractor::new()
        .extract_file(&dir.path().join("Ui/Panel.xaml"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailed);
    assert_eq!(err.operation(), "markup::extract_file");
}
