//! Descriptor records of a sample "shop" environment.
//!
//! The environment has two layers: `distribution`, the shared descriptor
//! declaring components, providers, node sets and stacks, and `root`, a
//! development flavour inheriting from it. Resolved together they form a
//! model without any validation issue.

use env_model::{BaseUrlResolver, DEFAULT_BASE_URL, DescriptorLayer, EnvironmentRecord};

/// Least specific layer of the sample environment
pub const DISTRIBUTION_YAML: &str = r#"
name: shop
description: Online shop
components:
  components:
    swarm:
      repository: acme/swarm-orchestrator
      ref: v2.0.0
    aws:
      repository: acme/aws-provider
    shop:
      repository: acme/shop-stacks
orchestrator:
  component: swarm
  params:
    version: "24.0"
providers:
  aws:
    component: aws
    params:
      region: eu-west-1
      instance_type: t3.small
    proxy:
      http_proxy: http://proxy:3128
nodes:
  "*":
    instances: 1
    provider:
      name: aws
      params:
        volume_size: 20
    labels:
      tier: default
  managers:
    instances: 3
    labels:
      role: manager
  workers:
    instances: 2
    provider:
      name: aws
      params:
        instance_type: t3.large
stacks:
  network:
    component: shop
  database:
    component: shop
    dependsOn: [network]
  app:
    component: shop
    dependsOn: [database]
tasks:
  backup:
    component: shop
    playbook: playbooks/backup.yaml
    cron: "0 3 * * *"
hooks:
  deploy:
    after:
      - task: backup
"#;

/// Most specific layer of the sample environment
pub const ROOT_YAML: &str = r#"
qualifier: dev
components:
  parent:
    repository: acme/shop-distribution
    ref: v1.0.0
  components:
    monitoring:
      repository: acme/monitoring
providers:
  aws:
    params:
      region: us-east-1
    proxy:
      https_proxy: http://secure-proxy:3128
nodes:
  workers:
    instances: 5
stacks:
  monitoring:
    component: monitoring
    dependsOn: [app]
hooks:
  deploy:
    before:
      - task: backup
        prefix: pre
"#;

/// A layer declaring three stacks that depend on each other in a loop
pub const CYCLIC_STACKS_YAML: &str = r#"
stacks:
  "1":
    dependsOn: ["3"]
  "2":
    dependsOn: ["1"]
  "3":
    dependsOn: ["2"]
"#;

/// Parse a YAML descriptor record.
///
/// # Panics
/// Panics if `yaml` is not a valid record.
pub fn record(yaml: &str) -> EnvironmentRecord {
    serde_yaml::from_str(yaml)
        .unwrap_or_else(|e| panic!("invalid fixture record: {e}\n{yaml}"))
}

/// The two layers of the sample environment, least specific first.
pub fn shop_layers() -> Vec<DescriptorLayer> {
    vec![
        DescriptorLayer::new("distribution", record(DISTRIBUTION_YAML)),
        DescriptorLayer::new("root", record(ROOT_YAML)),
    ]
}

/// Resolver over the default public server.
pub fn default_resolver() -> BaseUrlResolver {
    BaseUrlResolver::new(DEFAULT_BASE_URL).expect("default base URL is valid")
}
