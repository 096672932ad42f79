//! Process tree building logic
//!
//! The forest is an arena: nodes live in one `Vec` and refer to each other by
//! index, parents included. A tree is rebuilt from scratch on every refresh
//! and never outlives the snapshot it was built from.

use std::collections::{HashMap, HashSet};

use crate::system::Process;

/// One process in the forest
#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    /// The wrapped process
    pub process: &'a Process,
    /// Child node indices, ascending by pid
    pub children: Vec<usize>,
    /// Parent node index (non-owning back-reference)
    pub parent: Option<usize>,
    /// Distance from the root (root = 0)
    pub depth: usize,
}

/// A row of the flattened, pre-order tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub pid: u32,
    pub depth: usize,
    /// Box-drawing guide such as `"│   └── "`
    pub guide: String,
}

/// Parent/child forest over one snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProcessTree<'a> {
    nodes: Vec<TreeNode<'a>>,
    index: HashMap<u32, usize>,
    roots: Vec<usize>,
    anomalies: Vec<u32>,
}

impl<'a> ProcessTree<'a> {
    /// Builds the forest for `processes`.
    ///
    /// A process whose parent is absent (or is pid 0) becomes a root. Processes
    /// caught in an ancestry cycle are promoted to roots and reported through
    /// [`ProcessTree::anomalies`].
    pub fn build(processes: &'a [Process]) -> Self {
        let mut tree = ProcessTree::default();

        // Pass 1: one node per pid
        for process in processes {
            if tree.index.contains_key(&process.pid) {
                log::warn!("Duplicate pid {} in snapshot, keeping first", process.pid);
                continue;
            }
            tree.index.insert(process.pid, tree.nodes.len());
            tree.nodes.push(TreeNode {
                process,
                children: Vec::new(),
                parent: None,
                depth: 0,
            });
        }

        // Pass 2: link each node to its parent
        for i in 0..tree.nodes.len() {
            let process = tree.nodes[i].process;
            let parent = match process.ppid {
                0 => None,
                ppid if ppid == process.pid => {
                    log::warn!("Process {} is its own parent, showing it as a root", ppid);
                    tree.anomalies.push(ppid);
                    None
                }
                ppid => tree.index.get(&ppid).copied(),
            };
            match parent {
                Some(p) => {
                    tree.nodes[p].children.push(i);
                    tree.nodes[i].parent = Some(p);
                }
                None => tree.roots.push(i),
            }
        }

        tree.sort_children();
        tree.assign_depths();
        tree
    }

    fn sort_children(&mut self) {
        let pids: Vec<u32> = self.nodes.iter().map(|n| n.process.pid).collect();
        for node in &mut self.nodes {
            node.children.sort_by_key(|&c| pids[c]);
        }
        self.roots.sort_by_key(|&r| pids[r]);
    }

    /// Walks from every root; whatever stays unvisited sits on a cycle.
    fn assign_depths(&mut self) {
        let mut visited = HashSet::with_capacity(self.nodes.len());
        for root in self.roots.clone() {
            self.walk_depths(root, &mut visited);
        }

        for i in 0..self.nodes.len() {
            if visited.contains(&i) {
                continue;
            }
            let pid = self.nodes[i].process.pid;
            log::warn!("Process {} has a cyclic ancestry, showing it as a root", pid);
            self.anomalies.push(pid);

            if let Some(parent) = self.nodes[i].parent.take() {
                self.nodes[parent].children.retain(|&c| c != i);
            }
            self.roots.push(i);
            self.walk_depths(i, &mut visited);
        }

        if !self.anomalies.is_empty() {
            self.anomalies.sort_unstable();
            let pids: Vec<u32> = self.nodes.iter().map(|n| n.process.pid).collect();
            self.roots.sort_by_key(|&r| pids[r]);
        }
    }

    fn walk_depths(&mut self, root: usize, visited: &mut HashSet<usize>) {
        let mut stack = vec![(root, 0usize)];
        while let Some((i, depth)) = stack.pop() {
            if !visited.insert(i) {
                continue;
            }
            self.nodes[i].depth = depth;
            for &child in self.nodes[i].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes, ascending by pid
    pub fn roots(&self) -> impl Iterator<Item = &TreeNode<'a>> {
        self.roots.iter().map(|&i| &self.nodes[i])
    }

    /// Children of `node`, ascending by pid
    pub fn children<'s>(&'s self, node: &'s TreeNode<'a>) -> impl Iterator<Item = &'s TreeNode<'a>> {
        node.children.iter().map(|&i| &self.nodes[i])
    }

    /// Parent of `node`, if it has one in this snapshot
    pub fn parent(&self, node: &TreeNode<'a>) -> Option<&TreeNode<'a>> {
        node.parent.map(|i| &self.nodes[i])
    }

    /// Pids promoted to roots because their ancestry cycled (self-parented
    /// processes included), ascending
    pub fn anomalies(&self) -> &[u32] {
        &self.anomalies
    }

    /// Looks up the node for `pid`.
    pub fn find_by_pid(&self, pid: u32) -> Option<&TreeNode<'a>> {
        self.index.get(&pid).map(|&i| &self.nodes[i])
    }

    /// All transitive children of `pid` in pre-order, not including `pid`.
    pub fn descendants_of(&self, pid: u32) -> Vec<u32> {
        let Some(&start) = self.index.get(&pid) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        let mut stack: Vec<usize> = self.nodes[start].children.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            result.push(self.nodes[i].process.pid);
            stack.extend(self.nodes[i].children.iter().rev());
        }
        result
    }

    /// Flattens the forest in pre-order with depth and drawing guides.
    pub fn rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::with_capacity(self.nodes.len());
        // (node, ancestors' "has more siblings" flags, is last sibling)
        let mut stack: Vec<(usize, Vec<bool>, bool)> = Vec::new();
        let root_count = self.roots.len();
        for (n, &root) in self.roots.iter().enumerate().rev() {
            stack.push((root, Vec::new(), n + 1 == root_count));
        }

        while let Some((i, lineage, is_last)) = stack.pop() {
            let node = &self.nodes[i];
            let mut guide = String::new();
            for &more in &lineage {
                guide.push_str(if more { "│   " } else { "    " });
            }
            guide.push_str(if is_last { "└── " } else { "├── " });

            rows.push(TreeRow {
                pid: node.process.pid,
                depth: node.depth,
                guide,
            });

            let mut child_lineage = lineage;
            child_lineage.push(!is_last);
            let count = node.children.len();
            for (n, &child) in node.children.iter().enumerate().rev() {
                stack.push((child, child_lineage.clone(), n + 1 == count));
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::process;

    fn pids<'t, 'a: 't>(nodes: impl Iterator<Item = &'t TreeNode<'a>>) -> Vec<u32> {
        nodes.map(|n| n.process.pid).collect()
    }

    #[test]
    fn test_init_sshd_bash_chain() {
        let procs = vec![process(1, 0, "init"), process(50, 1, "sshd"), process(99, 50, "bash")];
        let tree = ProcessTree::build(&procs);

        assert_eq!(pids(tree.roots()), vec![1]);
        let init = tree.find_by_pid(1).unwrap();
        assert_eq!(pids(tree.children(init)), vec![50]);
        let sshd = tree.find_by_pid(50).unwrap();
        assert_eq!(pids(tree.children(sshd)), vec![99]);
        assert_eq!(tree.find_by_pid(99).unwrap().depth, 2);
        assert_eq!(tree.parent(sshd).map(|n| n.process.pid), Some(1));
        assert_eq!(tree.descendants_of(1), vec![50, 99]);
        assert!(tree.descendants_of(99).is_empty());
        assert!(tree.descendants_of(12345).is_empty());
    }

    #[test]
    fn test_every_process_appears_once() {
        let procs = vec![
            process(1, 0, "init"),
            process(2, 0, "kthreadd"),
            process(10, 2, "kworker"),
            process(30, 1, "a"),
            process(20, 1, "b"),
            process(40, 777, "orphan"),
            process(41, 40, "orphan-child"),
        ];
        let tree = ProcessTree::build(&procs);

        let child_edges: usize = (0..tree.len())
            .map(|i| tree.nodes[i].children.len())
            .sum();
        assert_eq!(child_edges + tree.roots().count(), procs.len());
        assert_eq!(pids(tree.roots()), vec![1, 2, 40]);

        let init = tree.find_by_pid(1).unwrap();
        assert_eq!(pids(tree.children(init)), vec![20, 30]);
    }

    #[test]
    fn test_cycle_does_not_recurse_forever() {
        // 5 -> 6 -> 7 -> 5, plus a self-parented process
        let procs = vec![
            process(1, 0, "init"),
            process(5, 7, "a"),
            process(6, 5, "b"),
            process(7, 6, "c"),
            process(8, 8, "self"),
        ];
        let tree = ProcessTree::build(&procs);

        assert_eq!(tree.anomalies(), &[5, 8]);
        assert_eq!(pids(tree.roots()), vec![1, 5, 8]);
        assert_eq!(tree.descendants_of(5), vec![6, 7]);
        assert_eq!(tree.find_by_pid(7).unwrap().depth, 2);

        let child_edges: usize = tree.nodes.iter().map(|n| n.children.len()).sum();
        assert_eq!(child_edges + tree.roots().count(), procs.len());
        assert_eq!(tree.rows().len(), procs.len());
    }

    #[test]
    fn test_self_parented_process_reported() {
        let procs = vec![process(1, 0, "init"), process(8, 8, "self")];
        let tree = ProcessTree::build(&procs);

        assert_eq!(tree.anomalies(), &[8]);
        assert_eq!(pids(tree.roots()), vec![1, 8]);
        assert!(tree.descendants_of(8).is_empty());
    }

    #[test]
    fn test_rows_preorder_with_guides() {
        let procs = vec![
            process(1, 0, "init"),
            process(2, 1, "a"),
            process(3, 2, "a1"),
            process(4, 1, "b"),
        ];
        let tree = ProcessTree::build(&procs);
        let rows = tree.rows();

        let order: Vec<u32> = rows.iter().map(|r| r.pid).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
        assert_eq!(rows[0].guide, "└── ");
        assert_eq!(rows[1].guide, "    ├── ");
        assert_eq!(rows[2].guide, "    │   └── ");
        assert_eq!(rows[3].guide, "    └── ");
        assert_eq!(rows[2].depth, 2);
    }

    #[test]
    fn test_empty_snapshot() {
        let procs: Vec<Process> = Vec::new();
        let tree = ProcessTree::build(&procs);
        assert!(tree.is_empty());
        assert!(tree.rows().is_empty());
    }
}
