//! Node aliases: absolute, relative, chained and array-valued references to
//! whole subtrees.

#![expect(
    clippy::panic_in_result_fn,
    reason = "assertions read better than ensure! for value comparisons"
)]

use std::collections::HashMap;

use anyhow::{Context, Result, ensure};
use cfgtree::{ChildKind, Config, ConfigError, DefaultFactory};
use rstest::rstest;

const XML: &str = r"
<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<ConfigShould>
    <Ingredients>
        <Array>
            <.>Elem1</.>
            <.>Elem2</.>
            <.>Elem3</.>
        </Array>
    </Ingredients>
    <System>
        <DataPath>%env.RUNTIME%/data</DataPath>
        <SessionFile>filename</SessionFile>
        <SessionId>STH</SessionId>
        <SessionInstance>20</SessionInstance>
        <SessionUniqueId>%config.ConfigShould.System.SessionId%-%config.ConfigShould.System.SessionInstance%</SessionUniqueId>
        <SessionUniqueId2>%config.ConfigShould.System.SessionUniqueId%-2</SessionUniqueId2>
        <SessionStatus>Disabled</SessionStatus>
    </System>
    <NodeInjected>
        %node.ConfigShould.System%
    </NodeInjected>
    <ArrayInjected>
        <.>%node.ConfigShould.Ingredients%</.>
        <.>%node.ConfigShould.Ingredients%</.>
    </ArrayInjected>
    <Gateway>
        <Parameters>
            <Destination>XETRA</Destination>
            <LinkId>155</LinkId>
        </Parameters>
        <Settings>
            <Link>%node..Parameters%</Link>
        </Settings>
        <ParametersAlias>%node.Parameters%</ParametersAlias>
        <LinkAlias>%node.Settings.Link%</LinkAlias>
        <Optional>%node.Nowhere%</Optional>
    </Gateway>
</ConfigShould>";

const JSON: &str = r#"{
    "ConfigShould": {
        "Ingredients": {
            "Array": ["Elem1", "Elem2", "Elem3"]
        },
        "System": {
            "DataPath": "%env.RUNTIME%/data",
            "SessionFile": "filename",
            "SessionId": "STH",
            "SessionInstance": 20,
            "SessionUniqueId": "%config.ConfigShould.System.SessionId%-%config.ConfigShould.System.SessionInstance%",
            "SessionUniqueId2": "%config.ConfigShould.System.SessionUniqueId%-2",
            "SessionStatus": "Disabled"
        },
        "NodeInjected": "%node.ConfigShould.System%",
        "ArrayInjected": [
            "%node.ConfigShould.Ingredients%",
            "%node.ConfigShould.Ingredients%"
        ],
        "Gateway": {
            "Parameters": {
                "Destination": "XETRA",
                "LinkId": "155"
            },
            "Settings": {
                "Link": "%node..Parameters%"
            },
            "ParametersAlias": "%node.Parameters%",
            "LinkAlias": "%node.Settings.Link%",
            "Optional": "%node.Nowhere%"
        }
    }
}"#;

fn factory() -> DefaultFactory<HashMap<String, String>> {
    DefaultFactory::new().with_env(HashMap::from([(
        "RUNTIME".to_owned(),
        "/root".to_owned(),
    )]))
}

fn load(contents: &str) -> Result<Config> {
    Ok(factory().create([contents])?)
}

fn text(config: &Config, path: &str) -> Result<String> {
    config
        .get::<String>(path)?
        .with_context(|| format!("no value at {path}"))
}

#[rstest]
#[case::xml(XML)]
#[case::json(JSON)]
fn absolute_alias_sees_expanded_values(#[case] contents: &str) -> Result<()> {
    let config = load(contents)?;
    let injected = config.scope("ConfigShould.NodeInjected");
    ensure!(injected.is_initialized(), "alias was not injected");
    assert_eq!(text(&injected, "SessionFile")?, "filename");
    assert_eq!(text(&injected, "DataPath")?, "/root/data");
    assert_eq!(text(&injected, "SessionUniqueId2")?, "STH-20-2");
    assert_eq!(text(&injected, "SessionStatus")?, "Disabled");
    Ok(())
}

#[rstest]
#[case::xml(XML)]
#[case::json(JSON)]
fn array_entries_become_aliases(#[case] contents: &str) -> Result<()> {
    let config = load(contents)?;
    let scopes = config.scope("ConfigShould.ArrayInjected").scopes(".");
    assert_eq!(scopes.len(), 2);
    for scope in &scopes {
        assert_eq!(scope.get_all::<String>("Array.")?, ["Elem1", "Elem2", "Elem3"]);
    }
    Ok(())
}

#[rstest]
#[case::xml(XML, "ConfigShould.Gateway.Settings.Link")]
#[case::json(JSON, "ConfigShould.Gateway.Settings.Link")]
#[case::xml_same_level(XML, "ConfigShould.Gateway.ParametersAlias")]
#[case::json_same_level(JSON, "ConfigShould.Gateway.ParametersAlias")]
#[case::xml_chain(XML, "ConfigShould.Gateway.LinkAlias")]
#[case::json_chain(JSON, "ConfigShould.Gateway.LinkAlias")]
fn relative_aliases_reach_parameters(#[case] contents: &str, #[case] path: &str) -> Result<()> {
    let config = load(contents)?;
    let scope = config.scope(path);
    assert_eq!(text(&scope, "Destination")?, "XETRA");
    assert_eq!(text(&scope, "LinkId")?, "155");
    Ok(())
}

#[rstest]
#[case::xml(XML)]
#[case::json(JSON)]
fn writes_through_an_alias_reach_the_target(#[case] contents: &str) -> Result<()> {
    let config = load(contents)?;
    if let Some(mut values) = config.get_mut("ConfigShould.NodeInjected.SessionStatus")
        && let Some(status) = values.first_mut()
    {
        "Enabled".clone_into(status);
    }
    assert_eq!(text(&config, "ConfigShould.System.SessionStatus")?, "Enabled");
    assert_eq!(text(&config, "ConfigShould.Gateway.LinkAlias.Destination")?, "XETRA");
    Ok(())
}

#[rstest]
#[case::xml(XML)]
#[case::json(JSON)]
fn unresolved_alias_is_left_in_place(#[case] contents: &str) -> Result<()> {
    let config = load(contents)?;
    assert_eq!(text(&config, "ConfigShould.Gateway.Optional")?, "%node.Nowhere%");
    Ok(())
}

#[rstest]
#[case::xml(
    r"<Config><LinkArray><.><Destination>LSE</Destination></.><.>%node.Other%</.></LinkArray></Config>"
)]
#[case::json(r#"{"Config": {"LinkArray": [{"Destination": "LSE"}, "%node.Other%"]}}"#)]
fn arrays_mixing_nodes_and_values_are_rejected(#[case] contents: &str) -> Result<()> {
    let err = load(contents).err();
    let mismatch = err
        .as_ref()
        .and_then(|error| error.downcast_ref::<ConfigError>());
    ensure!(
        matches!(
            mismatch,
            Some(ConfigError::KindMismatch {
                existing: ChildKind::Nodes,
                requested: ChildKind::Values,
                ..
            })
        ),
        "unexpected outcome: {err:?}"
    );
    Ok(())
}
