//! Reader tests over realistic client-library modules.
//!
//! Every callable listed by `members()` must reparse standalone into the same
//! definition the whole-module read produced.

use transcoder_syntax::{
    Expr, MemberKind, Reader, Stmt, read_python, read_python_members, reader_for_extension,
};

const PROJECT_MODULE: &str = r#"
from . import client as raw
from .sorting import sort_by_name

default = raw.default_client


def all_projects(client=default):
    """
    Returns:
        list: Projects stored in the database.
    """
    projects = raw.fetch_all("projects", client=client)
    return sort_by_name(projects)


def get_project(project_id, client=default):
    return raw.fetch_one("projects", project_id, client=client)


def update_project_data(project, data={}):
    project = normalize_model_parameter(project)
    if "data" not in project:
        project["data"] = {}
    for key in data:
        project["data"][key] = data[key]
    return update_project(project)
"#;

#[test]
fn members_reparse_to_module_definitions() {
    let module = read_python(PROJECT_MODULE).expect("module parses");
    let members = read_python_members(PROJECT_MODULE).expect("members parse");
    let reader = reader_for_extension("py").expect("python reader");

    let definitions: Vec<_> = module
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::FunctionDef(def) => Some(def.clone()),
            _ => None,
        })
        .collect();

    let reparsed: Vec<_> = members
        .iter()
        .filter_map(|member| match &member.kind {
            MemberKind::Callable { source } => {
                Some(reader.read_function(source).expect("callable reparses"))
            }
            _ => None,
        })
        .collect();

    assert_eq!(definitions.len(), 3);
    assert_eq!(definitions, reparsed);
}

#[test]
fn relative_import_alias_is_a_submodule() {
    let members = read_python_members(PROJECT_MODULE).unwrap();
    let raw = members.iter().find(|m| m.name == "raw").expect("raw member");
    assert_eq!(
        raw.kind,
        MemberKind::Submodule {
            path: "client".into()
        }
    );
}

#[test]
fn function_body_shapes() {
    let module = read_python(PROJECT_MODULE).unwrap();
    let Some(Stmt::FunctionDef(update)) = module
        .body
        .iter()
        .find(|s| matches!(s, Stmt::FunctionDef(d) if d.name == "update_project_data"))
    else {
        panic!("update_project_data not found");
    };

    assert_eq!(update.params, vec!["project", "data"]);
    assert!(matches!(update.body[0], Stmt::Assign { .. }));
    assert!(matches!(update.body[1], Stmt::If { .. }));
    assert!(matches!(update.body[2], Stmt::ForEach { .. }));
    assert!(matches!(update.body[3], Stmt::Return(Some(Expr::Call { .. }))));
}

#[test]
fn docstring_survives_as_first_statement() {
    let module = read_python(PROJECT_MODULE).unwrap();
    let Some(Stmt::FunctionDef(all)) = module
        .body
        .iter()
        .find(|s| matches!(s, Stmt::FunctionDef(d) if d.name == "all_projects"))
    else {
        panic!("all_projects not found");
    };
    assert!(matches!(all.body[0], Stmt::Expr(Expr::Constant(_))));
}
