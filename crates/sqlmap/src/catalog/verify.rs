use super::Catalog;
use crate::{mapping::Route, Error, ResultMap, Result};

struct Verify<'a> {
    catalog: &'a Catalog,
}

impl Catalog {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { catalog: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for result_map in self.catalog.result_maps() {
            self.verify_references(result_map)?;
        }

        for statement in self.catalog.statements() {
            self.catalog.statement_result_map(statement)?;
        }

        self.verify_nested_cycles_are_grouped()?;
        Ok(())
    }

    fn verify_references(&self, result_map: &ResultMap) -> Result<()> {
        for mapping in result_map.declared_mappings().iter() {
            match mapping.route() {
                Route::NestedResultMap { result_map: id } => {
                    self.catalog.result_map(id)?;
                }
                Route::NestedSelect { statement } => {
                    self.catalog.statement(statement)?;
                }
                Route::Primitive => {}
            }
        }

        if let Some(discriminator) = result_map.discriminator() {
            for (_, id) in discriminator.sub_maps() {
                self.catalog.result_map(id)?;
            }
        }

        Ok(())
    }

    /// Nested result maps may only come back to themselves through maps that
    /// all group their rows; otherwise assembly would never end.
    fn verify_nested_cycles_are_grouped(&self) -> Result<()> {
        let maps = &self.catalog.result_maps;

        let edges: Vec<Vec<usize>> = maps
            .values()
            .map(|result_map| {
                result_map
                    .declared_mappings()
                    .iter()
                    .filter_map(|mapping| match mapping.route() {
                        Route::NestedResultMap { result_map: child } => {
                            maps.get_index_of(child.as_str())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect();

        for component in Components::new(edges).find() {
            let ungrouped = component
                .iter()
                .filter_map(|index| maps.get_index(*index))
                .find(|(_, result_map)| result_map.group_by().is_empty());

            if let Some((ungrouped, _)) = ungrouped {
                let cycle: Vec<&str> = component
                    .iter()
                    .filter_map(|index| maps.get_index(*index))
                    .map(|(id, _)| id.as_str())
                    .collect();

                return Err(Error::configuration(format!(
                    "the nested result maps {} form a cycle, and {ungrouped} has no group-by; \
                     every result map on a nested cycle must group its rows",
                    cycle.join(", ")
                )));
            }
        }

        Ok(())
    }
}

/// Strongly connected components of the nested result map graph, found with
/// Tarjan's algorithm. Nodes are indices into the catalog's result maps.
struct Components {
    edges: Vec<Vec<usize>>,
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next: usize,
    cyclic: Vec<Vec<usize>>,
}

impl Components {
    fn new(edges: Vec<Vec<usize>>) -> Components {
        let len = edges.len();
        Components {
            edges,
            index: vec![None; len],
            low: vec![0; len],
            on_stack: vec![false; len],
            stack: vec![],
            next: 0,
            cyclic: vec![],
        }
    }

    /// Returns the components that contain a cycle: more than one map, or a
    /// single map nesting itself. Members are sorted by catalog position.
    fn find(mut self) -> Vec<Vec<usize>> {
        for node in 0..self.edges.len() {
            if self.index[node].is_none() {
                self.connect(node);
            }
        }
        self.cyclic
    }

    fn connect(&mut self, node: usize) {
        self.index[node] = Some(self.next);
        self.low[node] = self.next;
        self.next += 1;
        self.stack.push(node);
        self.on_stack[node] = true;

        for i in 0..self.edges[node].len() {
            let child = self.edges[node][i];
            match self.index[child] {
                None => {
                    self.connect(child);
                    self.low[node] = self.low[node].min(self.low[child]);
                }
                Some(index) if self.on_stack[child] => {
                    self.low[node] = self.low[node].min(index);
                }
                Some(_) => {}
            }
        }

        if Some(self.low[node]) != self.index[node] {
            return;
        }

        let mut component = vec![];
        while let Some(member) = self.stack.pop() {
            self.on_stack[member] = false;
            component.push(member);
            if member == node {
                break;
            }
        }

        if component.len() > 1 || self.edges[node].contains(&node) {
            component.sort_unstable();
            self.cyclic.push(component);
        }
    }
}
