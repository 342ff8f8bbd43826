//! Tests for layered resolution, validation and stack ordering

use env_model::{
    ComponentKind, DescriptorLayer, Environment, EnvironmentRecord, EnvironmentResolver, Error,
    ErrorType, GENERIC_NODE_SET_NAME, Value,
};
use env_test_utils::fixtures::{self, CYCLIC_STACKS_YAML, record, shop_layers};
use rstest::rstest;

fn resolve(layers: &[DescriptorLayer]) -> env_model::Result<Environment> {
    let repositories = fixtures::default_resolver();
    EnvironmentResolver::new(&repositories).resolve(layers)
}

fn issues_at(env: &Environment) -> Vec<(ErrorType, String)> {
    env.validate()
        .iter()
        .map(|e| (e.error_type, e.location.path.clone()))
        .collect()
}

mod resolution_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_environment_is_valid() {
        let env = resolve(&shop_layers()).unwrap();
        let errors = env.validate();
        assert!(errors.is_empty(), "unexpected issues:\n{errors}");
    }

    #[test]
    fn test_most_specific_layer_wins() {
        let env = resolve(&shop_layers()).unwrap();

        assert_eq!(env.descriptor, "root");
        assert_eq!(env.qualified_name().as_str(), "shop_dev");
        assert_eq!(env.description, "Online shop");

        let aws = env.providers().get("aws").unwrap();
        assert_eq!(aws.parameters.get("region"), Some(&Value::from("us-east-1")));
        assert_eq!(aws.parameters.get("instance_type"), Some(&Value::from("t3.small")));
        assert_eq!(aws.proxy.http.as_deref(), Some("http://proxy:3128"));
        assert_eq!(aws.proxy.https.as_deref(), Some("http://secure-proxy:3128"));
    }

    #[test]
    fn test_platform_tracks_parent_chain() {
        let env = resolve(&shop_layers()).unwrap();
        let platform = env.platform();

        assert_eq!(platform.current().id, "root");
        assert_eq!(platform.current().kind, ComponentKind::Current);
        assert_eq!(platform.parent_ids(), &["distribution".to_string()]);

        let distribution = platform.component("distribution").unwrap();
        assert_eq!(distribution.kind, ComponentKind::Parent);
        assert_eq!(
            distribution.repository.location,
            "https://github.com/acme/shop-distribution"
        );
        assert_eq!(distribution.repository.reference, "v1.0.0");

        for id in ["swarm", "aws", "shop", "monitoring"] {
            assert_eq!(
                platform.component(id).map(|c| c.kind),
                Some(ComponentKind::Referenced),
                "component {id}"
            );
        }
    }

    #[test]
    fn test_parent_chain_lists_nearest_parent_first() {
        let layers = [
            DescriptorLayer::new("a", record("name: chain\n")),
            DescriptorLayer::new("b", record("components:\n  parent:\n    repository: acme/a\n")),
            DescriptorLayer::new("c", record("components:\n  parent:\n    repository: acme/b\n")),
        ];

        let env = resolve(&layers).unwrap();
        let platform = env.platform();

        assert_eq!(platform.current().id, "c");
        assert_eq!(platform.parent_ids(), &["b".to_string(), "a".to_string()]);
        let parents: Vec<_> = platform
            .parents()
            .map(|c| (c.id.as_str(), c.kind, c.repository.location.as_str()))
            .collect();
        assert_eq!(
            parents,
            vec![
                ("b", ComponentKind::Parent, "https://github.com/acme/b"),
                ("a", ComponentKind::Parent, "https://github.com/acme/a"),
            ]
        );
    }

    #[test]
    fn test_hooks_accumulate_across_layers() {
        let env = resolve(&shop_layers()).unwrap();
        let deploy = &env.hooks().deploy;

        assert_eq!(deploy.before.len(), 1);
        assert_eq!(deploy.before[0].prefix, "pre");
        assert_eq!(deploy.after.len(), 1);
        assert_eq!(deploy.after[0].task, "backup");
    }

    #[test]
    fn test_empty_chain_fails() {
        assert!(matches!(resolve(&[]), Err(Error::NoLayers)));
    }

    #[test]
    fn test_component_without_repository_fails_fast() {
        let layer = DescriptorLayer::new(
            "root",
            record(
                r#"
components:
  components:
    broken: {}
"#,
            ),
        );

        match resolve(&[layer]) {
            Err(Error::MissingRepository { id, descriptor }) => {
                assert_eq!(id, "broken");
                assert_eq!(descriptor, "root");
            }
            other => panic!("expected a missing repository error, got {other:?}"),
        }
    }
}

mod node_propagation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn generic_layer(named_params: &str) -> DescriptorLayer {
        let yaml = format!(
            r#"
nodes:
  "{GENERIC_NODE_SET_NAME}":
    instances: 1
    provider:
      name: aws
      params:
        param1: A
  workers:
    provider:
      params: {named_params}
"#
        );
        DescriptorLayer::new("root", record(&yaml))
    }

    #[test]
    fn test_generic_values_reach_named_sets() {
        let env = resolve(&[generic_layer("{param2: B}")]).unwrap();
        let workers = env.nodes().get("workers").unwrap();

        assert_eq!(workers.provider.name, "aws");
        assert_eq!(workers.instances, 1);
        assert_eq!(workers.provider.parameters.get("param1"), Some(&Value::from("A")));
        assert_eq!(workers.provider.parameters.get("param2"), Some(&Value::from("B")));
        assert!(env.nodes().get(GENERIC_NODE_SET_NAME).is_none());
    }

    #[test]
    fn test_named_set_overrides_generic() {
        let env = resolve(&[generic_layer("{param1: C, param2: B}")]).unwrap();
        let workers = env.nodes().get("workers").unwrap();

        assert_eq!(workers.provider.parameters.get("param1"), Some(&Value::from("C")));
    }

    #[test]
    fn test_effective_provider_of_a_node_set() {
        let env = resolve(&shop_layers()).unwrap();
        let workers = env.nodes().get("workers").unwrap();
        let provider = workers.provider.resolve(&env).unwrap();

        assert_eq!(workers.instances, 5);
        assert_eq!(workers.labels.get("tier"), Some("default"));
        assert_eq!(provider.parameters.get("region"), Some(&Value::from("us-east-1")));
        assert_eq!(provider.parameters.get("instance_type"), Some(&Value::from("t3.large")));
        assert_eq!(provider.parameters.get("volume_size"), Some(&Value::Integer(20)));
    }
}

mod validation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_environment_has_five_issues() {
        let issues = issues_at(&Environment::default());

        assert_eq!(
            issues,
            vec![
                (ErrorType::Error, "name".to_string()),
                (ErrorType::Error, "orchestrator.component".to_string()),
                (ErrorType::Error, "providers".to_string()),
                (ErrorType::Error, "nodes".to_string()),
                (ErrorType::Warning, "stacks".to_string()),
            ]
        );
    }

    #[test]
    fn test_issue_locations_name_the_descriptor() {
        let layer = DescriptorLayer::new("root.yaml", EnvironmentRecord::default());
        let env = resolve(&[layer]).unwrap();
        let errors = env.validate();
        assert!(errors.iter().all(|e| e.location.descriptor == "root.yaml"));
    }

    #[test]
    fn test_issue_inside_parent_entity_names_the_parent() {
        let layers = [
            DescriptorLayer::new(
                "base",
                record("nodes:\n  spare:\n    provider:\n      name: aws\n"),
            ),
            DescriptorLayer::new("root", record("name: shop\n")),
        ];

        let env = resolve(&layers).unwrap();
        let located: Vec<_> = env
            .validate()
            .iter()
            .map(|e| (e.location.descriptor.clone(), e.location.path.clone()))
            .collect();

        assert_eq!(
            located,
            vec![
                ("root".to_string(), "orchestrator.component".to_string()),
                ("root".to_string(), "providers".to_string()),
                ("base".to_string(), "nodes.spare.instances".to_string()),
                ("base".to_string(), "nodes.spare.provider".to_string()),
                ("root".to_string(), "stacks".to_string()),
            ]
        );
    }

    #[test]
    fn test_entity_keeps_origin_when_overridden() {
        let layers = [
            DescriptorLayer::new("base", record("tasks:\n  cleanup:\n    cron: \"@daily\"\n")),
            DescriptorLayer::new(
                "root",
                record("tasks:\n  cleanup:\n    cron: \"@hourly\"\n"),
            ),
        ];

        let env = resolve(&layers).unwrap();
        let cleanup = env.tasks().get("cleanup").unwrap();
        assert_eq!(cleanup.origin, "base");
        assert_eq!(cleanup.cron, "@hourly");

        let playbook: Vec<_> = env
            .validate()
            .into_iter()
            .filter(|e| e.location.path == "tasks.cleanup.playbook")
            .collect();
        assert_eq!(playbook.len(), 1);
        assert_eq!(playbook[0].location.descriptor, "base");
    }

    #[test]
    fn test_hook_tasks_name_the_layer_listing_them() {
        let layers = [
            DescriptorLayer::new("base", record("hooks:\n  init:\n    before:\n      - task: a\n")),
            DescriptorLayer::new("root", record("hooks:\n  init:\n    before:\n      - task: b\n")),
        ];

        let env = resolve(&layers).unwrap();
        let hook_issues: Vec<_> = env
            .validate()
            .into_iter()
            .filter(|e| e.location.path.starts_with("hooks."))
            .map(|e| (e.location.descriptor, e.location.path, e.message))
            .collect();

        assert_eq!(
            hook_issues,
            vec![
                (
                    "base".to_string(),
                    "hooks.init.before[0]".to_string(),
                    "reference to unknown task: a".to_string()
                ),
                (
                    "root".to_string(),
                    "hooks.init.before[1]".to_string(),
                    "reference to unknown task: b".to_string()
                ),
            ]
        );
    }

    #[rstest]
    #[case::unknown_hook_task(
        "hooks:\n  init:\n    before:\n      - task: missing\n",
        "hooks.init.before[0]",
        "reference to unknown task: missing"
    )]
    #[case::unknown_provider(
        "nodes:\n  workers:\n    instances: 1\n    provider:\n      name: gcp\n",
        "nodes.workers.provider",
        "reference to unknown provider: gcp"
    )]
    #[case::zero_instances(
        "nodes:\n  spare:\n    provider:\n      name: aws\n",
        "nodes.spare.instances",
        "instances must be a positive number"
    )]
    #[case::unknown_stack_component(
        "stacks:\n  app:\n    component: nowhere\n",
        "stacks.app.component",
        "reference to unknown component: nowhere"
    )]
    #[case::unknown_dependency(
        "stacks:\n  extra:\n    component: shop\n    dependsOn: [db]\n",
        "stacks.extra.dependsOn[0]",
        "dependency on unknown stack: db"
    )]
    #[case::self_dependency(
        "stacks:\n  extra:\n    component: shop\n    dependsOn: [extra]\n",
        "stacks.extra.dependsOn[0]",
        "stack extra depends on itself"
    )]
    #[case::empty_playbook(
        "tasks:\n  cleanup:\n    component: shop\n",
        "tasks.cleanup.playbook",
        "empty playbook path"
    )]
    #[case::empty_copy_path(
        "stacks:\n  app:\n    copies:\n      conf:\n        sources: [app.ini]\n",
        "stacks.app.copies.conf.path",
        "empty copy destination"
    )]
    fn test_issue_is_located(#[case] overlay: &str, #[case] path: &str, #[case] message: &str) {
        let mut layers = shop_layers();
        layers.push(DescriptorLayer::new("overlay", record(overlay)));

        let env = resolve(&layers).unwrap();
        let errors = env.validate();

        let found: Vec<_> = errors.iter().filter(|e| e.location.path == path).collect();
        assert_eq!(found.len(), 1, "issues:\n{errors}");
        assert_eq!(found[0].error_type, ErrorType::Error);
        assert_eq!(found[0].message, message);
    }

    #[test]
    fn test_invalid_environment_name() {
        let env = resolve(&[DescriptorLayer::new(
            "root",
            record("name: shop\nqualifier: dev-1\n"),
        )])
        .unwrap();

        let name_issues: Vec<_> = env
            .validate()
            .into_iter()
            .filter(|e| e.location.path == "name")
            .collect();

        assert_eq!(name_issues.len(), 1);
        assert!(name_issues[0].message.contains("shop_dev-1"));
    }
}

mod ordering_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stack_order_across_layers() {
        let env = resolve(&shop_layers()).unwrap();
        assert_eq!(
            env.stack_order().unwrap(),
            vec!["network", "database", "app", "monitoring"]
        );
    }

    #[test]
    fn test_cyclic_stacks_fail_to_order() {
        let env = resolve(&[DescriptorLayer::new("root", record(CYCLIC_STACKS_YAML))]).unwrap();
        let before = env.clone();

        let err = env.stack_order().unwrap_err();

        assert!(err.to_string().contains("cycle"), "{err}");
        assert_eq!(env, before);
    }

    #[test]
    fn test_thirteen_stacks_are_ordered() {
        let deps: &[(&str, &[&str])] = &[
            ("1", &[]),
            ("2", &["1"]),
            ("3", &["1"]),
            ("4", &["3"]),
            ("5", &["3"]),
            ("6", &["2"]),
            ("7", &["1"]),
            ("8", &["1"]),
            ("9", &["8"]),
            ("10", &["9"]),
            ("11", &["9"]),
            ("12", &["8"]),
            ("0", &[]),
        ];
        let mut yaml = String::from("stacks:\n");
        for (name, depends_on) in deps {
            let list: Vec<String> = depends_on.iter().map(|d| format!("\"{d}\"")).collect();
            yaml.push_str(&format!("  \"{name}\":\n    dependsOn: [{}]\n", list.join(", ")));
        }

        let env = resolve(&[DescriptorLayer::new("root", record(&yaml))]).unwrap();
        let order = env.stack_order().unwrap();

        assert_eq!(order.len(), 13);
        let position = |name: &str| order.iter().position(|n| n == name).unwrap();
        for (name, depends_on) in deps {
            for dep in *depends_on {
                assert!(position(dep) < position(name), "{dep} before {name} in {order:?}");
            }
        }
    }
}
