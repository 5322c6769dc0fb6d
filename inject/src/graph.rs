//! The dependency graph and its structural validation.
//!
//! Every `Key` seen while building the graph, as a binding or as a dependency,
//! gets a stable index on first sight. Edges are stored as index lists, and
//! both searches walk indices, so neither recursion depth nor ownership
//! depends on the shape of the graph.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{DeferredWrappers, GraphConfig};
use crate::error::{Error, Result, ValidationErrors};
use crate::key::Key;

// --- Declarations ---

/// A module-level provider: produces `key` from `dependencies`.
#[derive(Debug, Clone)]
pub struct ProviderDecl {
  origin: Arc<str>,
  key: Key,
  dependencies: Vec<Key>,
}

impl ProviderDecl {
  /// `origin` names the declaration in diagnostics, e.g. `"AppModule.provideClock"`.
  pub fn new(origin: impl Into<Arc<str>>, key: Key, dependencies: Vec<Key>) -> Self {
    Self {
      origin: origin.into(),
      key,
      dependencies,
    }
  }

  pub fn key(&self) -> &Key {
    &self.key
  }

  pub fn dependencies(&self) -> &[Key] {
    &self.dependencies
  }
}

/// A type whose constructor, fields or methods need injected dependencies.
#[derive(Debug, Clone)]
pub struct InjectionTarget {
  origin: Arc<str>,
  key: Key,
  constructor: Option<Vec<Key>>,
  fields: Vec<Key>,
  methods: Vec<Vec<Key>>,
}

impl InjectionTarget {
  pub fn new(origin: impl Into<Arc<str>>, key: Key) -> Self {
    Self {
      origin: origin.into(),
      key,
      constructor: None,
      fields: Vec::new(),
      methods: Vec::new(),
    }
  }

  /// Declares the primary injectable constructor and its parameter keys.
  pub fn constructor(mut self, parameters: Vec<Key>) -> Self {
    self.constructor = Some(parameters);
    self
  }

  pub fn field(mut self, key: Key) -> Self {
    self.fields.push(key);
    self
  }

  pub fn method(mut self, parameters: Vec<Key>) -> Self {
    self.methods.push(parameters);
    self
  }

  pub fn key(&self) -> &Key {
    &self.key
  }

  pub fn has_constructor(&self) -> bool {
    self.constructor.is_some()
  }

  /// Constructor parameters, then fields, then method parameters.
  pub fn dependencies(&self) -> impl Iterator<Item = &Key> {
    self
      .constructor
      .iter()
      .flatten()
      .chain(self.fields.iter())
      .chain(self.methods.iter().flatten())
  }
}

// --- Graph ---

#[derive(Debug, Clone, Copy)]
struct Edge {
  target: usize,
  // Satisfied through a deferred wrapper; never constructs the target eagerly.
  deferred: bool,
}

#[derive(Debug)]
struct Node {
  origin: Arc<str>,
  edges: Vec<Edge>,
}

/// A members-injection target without an injectable constructor. It has no
/// entry of its own, but its dependencies still need bindings.
#[derive(Debug)]
struct Root {
  key: usize,
  edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
  Unvisited,
  InProgress,
  Resolved,
}

/// Keys mapped to the keys they depend on. Read-only once built.
#[derive(Debug)]
pub struct DependencyGraph {
  config: GraphConfig,
  keys: Vec<Key>,
  index: HashMap<Key, usize>,
  // `None` for keys referenced as dependencies but never declared.
  nodes: Vec<Option<Node>>,
  roots: Vec<Root>,
}

impl DependencyGraph {
  pub fn builder(config: GraphConfig) -> GraphBuilder {
    GraphBuilder {
      deferred: config.deferred_set(),
      config,
      keys: Vec::new(),
      index: HashMap::new(),
      nodes: Vec::new(),
      roots: Vec::new(),
      duplicates: ValidationErrors::default(),
    }
  }

  /// Builds a graph from every provider and injection target of one analysis pass.
  pub fn from_declarations(
    providers: impl IntoIterator<Item = ProviderDecl>,
    targets: impl IntoIterator<Item = InjectionTarget>,
    config: GraphConfig,
  ) -> Result<Self> {
    let mut builder = Self::builder(config);
    for provider in providers {
      builder.add_provider(provider);
    }
    for target in targets {
      builder.add_injection_target(target);
    }
    builder.build()
  }

  pub fn config(&self) -> &GraphConfig {
    &self.config
  }

  /// Number of keys with an entry.
  pub fn len(&self) -> usize {
    self.nodes.iter().filter(|node| node.is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn contains(&self, key: &Key) -> bool {
    self
      .index
      .get(key)
      .map_or(false, |&i| self.nodes[i].is_some())
  }

  /// Keys with an entry, in first-seen order.
  pub fn keys(&self) -> impl Iterator<Item = &Key> {
    self
      .keys
      .iter()
      .zip(&self.nodes)
      .filter_map(|(key, node)| node.as_ref().map(|_| key))
  }

  /// The dependencies of `key`'s entry, in declaration order. Dependencies
  /// through a deferred wrapper are reported as the wrapped key.
  pub fn dependencies_of(&self, key: &Key) -> Option<Vec<&Key>> {
    let node = self.nodes[*self.index.get(key)?].as_ref()?;
    Some(node.edges.iter().map(|edge| &self.keys[edge.target]).collect())
  }

  /// The origin of the declaration that produced `key`'s entry.
  pub fn origin_of(&self, key: &Key) -> Option<&str> {
    let node = self.nodes[*self.index.get(key)?].as_ref()?;
    Some(&node.origin)
  }

  // --- Searches ---

  /// Every key reachable from an entry (or members-injection root) that has
  /// no entry itself. Each key is reported once, in discovery order.
  pub fn find_unresolved(&self) -> Vec<Key> {
    self
      .collect_unresolved()
      .into_iter()
      .map(|(key, _)| self.keys[key].clone())
      .collect()
  }

  /// Every key reachable from itself through eager dependency edges, in
  /// first-seen order. Each key is reported once, however many cycles it
  /// takes part in.
  pub fn find_cycles(&self) -> Vec<Key> {
    self
      .collect_cyclic()
      .into_iter()
      .map(|key| self.keys[key].clone())
      .collect()
  }

  /// Runs both searches and reports every fault together.
  ///
  /// Unresolved dependencies are only reported for a complete graph.
  pub fn validate(&self) -> Result<()> {
    let mut errors = ValidationErrors::default();

    let unresolved = if self.config.complete {
      self.collect_unresolved()
    } else {
      Vec::new()
    };
    for &(key, required_by) in &unresolved {
      errors.push(Error::UnresolvedDependency {
        key: self.keys[key].clone(),
        required_by: self.keys[required_by].clone(),
      });
    }

    let cyclic = self.collect_cyclic();
    for &key in &cyclic {
      errors.push(Error::DependencyCycle {
        key: self.keys[key].clone(),
      });
    }

    debug!(
      entries = self.len(),
      unresolved = unresolved.len(),
      cyclic = cyclic.len(),
      "validated dependency graph"
    );
    errors.into_result()
  }

  fn edges(&self, node: usize) -> &[Edge] {
    match &self.nodes[node] {
      Some(node) => node.edges.as_slice(),
      None => &[],
    }
  }

  /// `(unresolved, first requester)` pairs.
  fn collect_unresolved(&self) -> Vec<(usize, usize)> {
    let mut visited = vec![false; self.keys.len()];
    let mut found = Vec::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let entries = self
      .nodes
      .iter()
      .enumerate()
      .filter_map(|(i, node)| node.as_ref().map(|node| (i, node.edges.as_slice(), true)));
    let roots = self
      .roots
      .iter()
      .map(|root| (root.key, root.edges.as_slice(), false));

    for (source, edges, is_entry) in entries.chain(roots) {
      if is_entry {
        if visited[source] {
          continue;
        }
        visited[source] = true;
      }
      stack.extend(edges.iter().rev().map(|edge| (edge.target, source)));

      while let Some((key, requester)) = stack.pop() {
        if visited[key] {
          continue;
        }
        visited[key] = true;
        match &self.nodes[key] {
          Some(node) => stack.extend(node.edges.iter().rev().map(|edge| (edge.target, key))),
          None => found.push((key, requester)),
        }
      }
    }
    found
  }

  /// Strongly connected components by an iterative three-state DFS.
  ///
  /// `InProgress` keys are on the component stack: reaching one closes a
  /// cycle. `Resolved` keys already belong to a finished component and are
  /// skipped. Keys in a component of two or more, or with a self edge, are
  /// cyclic.
  fn collect_cyclic(&self) -> Vec<usize> {
    let count = self.keys.len();
    let mut state = vec![VisitState::Unvisited; count];
    let mut discovered = vec![0usize; count];
    let mut low = vec![0usize; count];
    let mut cyclic = vec![false; count];
    let mut component_stack: Vec<usize> = Vec::new();
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut counter = 0usize;

    for start in 0..count {
      if state[start] != VisitState::Unvisited || self.nodes[start].is_none() {
        continue;
      }
      state[start] = VisitState::InProgress;
      discovered[start] = counter;
      low[start] = counter;
      counter += 1;
      component_stack.push(start);
      frames.push((start, 0));

      while let Some(frame) = frames.last_mut() {
        let node = frame.0;
        if let Some(edge) = self.edges(node).get(frame.1) {
          frame.1 += 1;
          if edge.deferred {
            continue;
          }
          let next = edge.target;
          if next == node {
            cyclic[node] = true;
          }
          match state[next] {
            VisitState::Unvisited => {
              state[next] = VisitState::InProgress;
              discovered[next] = counter;
              low[next] = counter;
              counter += 1;
              component_stack.push(next);
              frames.push((next, 0));
            }
            VisitState::InProgress => low[node] = low[node].min(discovered[next]),
            VisitState::Resolved => {}
          }
          continue;
        }

        frames.pop();
        if let Some(&(parent, _)) = frames.last() {
          low[parent] = low[parent].min(low[node]);
        }
        if low[node] == discovered[node] {
          let mut members = Vec::new();
          while let Some(member) = component_stack.pop() {
            state[member] = VisitState::Resolved;
            members.push(member);
            if member == node {
              break;
            }
          }
          if members.len() > 1 {
            for member in members {
              cyclic[member] = true;
            }
          }
        }
      }
    }

    (0..count).filter(|&i| cyclic[i]).collect()
  }
}

// --- Construction ---

/// Collects declarations into a [`DependencyGraph`].
///
/// A second declaration for a key already present is a conflict. It is logged
/// when seen and collected, so one build reports every duplicate.
pub struct GraphBuilder {
  config: GraphConfig,
  deferred: DeferredWrappers,
  keys: Vec<Key>,
  index: HashMap<Key, usize>,
  nodes: Vec<Option<Node>>,
  roots: Vec<Root>,
  duplicates: ValidationErrors,
}

impl GraphBuilder {
  pub fn add_provider(&mut self, provider: ProviderDecl) -> &mut Self {
    let i = self.intern(&provider.key);
    let edges = self.edges_for(provider.dependencies.iter());
    self.insert(i, provider.key, edges, provider.origin);
    self
  }

  /// Adds the target's constructor as an entry, or records it as a
  /// members-injection root when it has no injectable constructor.
  pub fn add_injection_target(&mut self, target: InjectionTarget) -> &mut Self {
    let i = self.intern(&target.key);
    let edges = self.edges_for(target.dependencies());
    if target.has_constructor() {
      self.insert(i, target.key, edges, target.origin);
    } else {
      self.roots.push(Root { key: i, edges });
    }
    self
  }

  pub fn build(self) -> Result<DependencyGraph> {
    self.duplicates.into_result()?;
    let graph = DependencyGraph {
      config: self.config,
      keys: self.keys,
      index: self.index,
      nodes: self.nodes,
      roots: self.roots,
    };
    debug!(
      entries = graph.len(),
      keys = graph.keys.len(),
      roots = graph.roots.len(),
      "built dependency graph"
    );
    Ok(graph)
  }

  fn intern(&mut self, key: &Key) -> usize {
    if let Some(&i) = self.index.get(key) {
      return i;
    }
    let i = self.keys.len();
    self.keys.push(key.clone());
    self.index.insert(key.clone(), i);
    self.nodes.push(None);
    i
  }

  fn edges_for<'a>(&mut self, dependencies: impl Iterator<Item = &'a Key>) -> Vec<Edge> {
    dependencies
      .map(|dependency| match self.deferred.unwrap(dependency.type_ref()) {
        Some(inner) => {
          let target = dependency.with_type(inner.clone());
          Edge {
            target: self.intern(&target),
            deferred: true,
          }
        }
        None => Edge {
          target: self.intern(dependency),
          deferred: false,
        },
      })
      .collect()
  }

  fn insert(&mut self, i: usize, key: Key, edges: Vec<Edge>, origin: Arc<str>) {
    match &self.nodes[i] {
      Some(existing) => {
        warn!(key = %key, first = %existing.origin, second = %origin, "duplicate provider");
        self.duplicates.push(Error::DuplicateProvider {
          key,
          first: existing.origin.to_string(),
          second: origin.to_string(),
        });
      }
      None => self.nodes[i] = Some(Node { origin, edges }),
    }
  }
}
