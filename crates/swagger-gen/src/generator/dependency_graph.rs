use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use super::model_projector::ModelEntry;

/// Import edges between model files, keyed by file key.
#[derive(Debug, Clone, Default)]
pub struct ModelDependencyGraph {
  dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl ModelDependencyGraph {
  #[must_use]
  pub fn from_models(models: &[ModelEntry]) -> Self {
    let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for model in models {
      let entry = dependencies.entry(model.key.clone()).or_default();
      entry.extend(model.dependencies.iter().map(|dep| dep.id.clone()));
    }
    Self { dependencies }
  }

  #[must_use]
  pub fn dependencies_of(&self, key: &str) -> Option<&BTreeSet<String>> {
    self.dependencies.get(key)
  }

  /// Groups of model files that import each other, directly or transitively.
  /// A file importing itself counts as a group of one.
  #[must_use]
  pub fn import_cycles(&self) -> Vec<Vec<String>> {
    let mut graph = DiGraphMap::<&str, ()>::new();
    for (node, deps) in &self.dependencies {
      graph.add_node(node.as_str());
      for dep in deps {
        graph.add_edge(node.as_str(), dep.as_str(), ());
      }
    }

    kosaraju_scc(&graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
      .map(|scc| scc.into_iter().map(String::from).sorted().collect::<Vec<_>>())
      .sorted()
      .collect()
  }
}
