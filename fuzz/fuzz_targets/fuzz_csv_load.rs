// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use grove::graph::ForestGraph;
use grove::loader::{read_paths, read_trees, LoadReport};
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: (&str, &str)| {
    let (trees, paths) = data;
    let mut graph = ForestGraph::new();
    let mut report = LoadReport::default();
    let _ = read_trees(trees, Path::new("trees.csv"), &mut graph, &mut report);
    let _ = read_paths(paths, Path::new("paths.csv"), &mut graph, &mut report);
    assert_eq!(graph.tree_count(), report.trees_loaded);
    assert!(graph.path_count() <= report.paths_loaded);
});
