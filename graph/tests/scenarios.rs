//! End-to-end checks of filtering, reduction and prefix selection on
//! hand-built histories.

use graph::core::prefix::minimal_prefix_length_of;
use graph::{minimal_prefix_length, reduce, CommitFilter, CommitGraph, LabelMap, RelationMap, FULL_ID_LEN};
use std::collections::BTreeSet;

fn map(entries: &[(&str, &[&str])]) -> RelationMap {
    entries
        .iter()
        .map(|(id, related)| {
            (
                id.to_string(),
                related.iter().map(|r| r.to_string()).collect(),
            )
        })
        .collect()
}

fn ids(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn assert_inverse(graph: &CommitGraph) {
    for (child, parents) in graph.parents() {
        for parent in parents {
            assert!(
                graph.children_of(parent).is_some_and(|c| c.contains(child)),
                "{} missing from children of {}",
                child,
                parent
            );
        }
    }
    for (parent, children) in graph.children() {
        for child in children {
            assert!(
                graph.parents_of(child).is_some_and(|p| p.contains(parent)),
                "{} missing from parents of {}",
                parent,
                child
            );
        }
    }
}

/// Is `ancestor` reachable from `commit` by following parent links?
fn reaches(graph: &CommitGraph, commit: &str, ancestor: &str) -> bool {
    let mut stack: Vec<&str> = vec![commit];
    let mut seen = BTreeSet::new();
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        for parent in graph.parents_of(current).into_iter().flatten() {
            if parent == ancestor {
                return true;
            }
            stack.push(parent);
        }
    }
    false
}

/// A history with two feature branches, a merge and a tag
fn busy_history() -> CommitGraph {
    //   A - B - C - D ------ H (main)
    //        \       \      /
    //         E - F   G ---'
    //             (topic)
    CommitGraph::new(
        map(&[
            ("A", &[]),
            ("B", &["A"]),
            ("C", &["B"]),
            ("D", &["C"]),
            ("E", &["B"]),
            ("F", &["E"]),
            ("G", &["D"]),
            ("H", &["D", "G"]),
        ]),
        map(&[("H", &["main"]), ("F", &["topic"])]),
        map(&[("C", &["v1.0"])]),
    )
    .unwrap()
}

#[test]
fn scenario_a_diamond_collapses_through_uninteresting_commits() {
    let full = CommitGraph::new(
        map(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])]),
        LabelMap::new(),
        LabelMap::new(),
    )
    .unwrap();

    let reduced = reduce(&full, &ids(&["A", "D"])).unwrap();

    assert_eq!(reduced.parents_of("D").unwrap(), &ids(&["A"]));
    assert!(reduced.parents_of("A").unwrap().is_empty());
    assert_eq!(reduced.node_count(), 2);
}

#[test]
fn scenario_b_tags_and_roots() {
    let full = CommitGraph::new(
        map(&[("A", &[]), ("B", &["A"]), ("C", &["B"])]),
        LabelMap::new(),
        map(&[("C", &["v1"])]),
    )
    .unwrap();

    let interesting = CommitFilter::none().tags(true).roots(true).interesting(&full);
    assert_eq!(interesting, ids(&["A", "C"]));

    let reduced = reduce(&full, &interesting).unwrap();
    assert_eq!(reduced.parents(), &map(&[("A", &[]), ("C", &["A"])]));
    assert!(reduced.tag_labels()["C"].contains("v1"));
}

#[test]
fn scenario_c_single_isolated_root() {
    let full = CommitGraph::new(map(&[("A", &[])]), LabelMap::new(), LabelMap::new()).unwrap();

    let interesting = CommitFilter::none().roots(true).interesting(&full);
    let reduced = reduce(&full, &interesting).unwrap();

    assert_eq!(reduced.node_count(), 1);
    assert_eq!(reduced.edge_count(), 0);
    assert!(reduced.contains("A"));
}

#[test]
fn scenario_d_seven_character_collision() {
    let a = "abcdefg1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    let b = "abcdefg2bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    let full = CommitGraph::new(map(&[(a, &[]), (b, &[a])]), LabelMap::new(), LabelMap::new()).unwrap();

    assert_eq!(minimal_prefix_length(&full), 8);
}

#[test]
fn reducing_fully_interesting_graph_is_identity() {
    let full = busy_history();
    let everything = CommitFilter::none().all(true).interesting(&full);

    let reduced = reduce(&full, &everything).unwrap();

    assert_eq!(reduced.parents(), full.parents());
    assert_eq!(reduced.children(), full.children());
    assert_eq!(reduced.edges(), full.edges());
}

#[test]
fn reduced_graphs_keep_the_inverse_invariant() {
    let full = busy_history();
    assert_inverse(&full);

    for filter in [
        CommitFilter::default(),
        CommitFilter::none().branches(true),
        CommitFilter::none().tags(true).roots(true),
        CommitFilter::none().merges(true).bifurcations(true),
        CommitFilter::none(),
    ] {
        let reduced = reduce(&full, &filter.interesting(&full)).unwrap();
        assert_inverse(&reduced);
        assert!(reduced.validate().is_ok());
    }
}

#[test]
fn reduced_graph_has_no_foreign_nodes() {
    let full = busy_history();
    let interesting = CommitFilter::default().interesting(&full);

    let reduced = reduce(&full, &interesting).unwrap();

    for commit in reduced.commits() {
        assert!(interesting.contains(commit), "{} was not selected", commit);
    }
}

#[test]
fn reduction_preserves_reachability() {
    let full = busy_history();
    let interesting = CommitFilter::default().interesting(&full);
    let reduced = reduce(&full, &interesting).unwrap();

    // Interesting: A (root), B (bifurcation), C (tag), D (bifurcation),
    // F (topic), H (main, merge)
    assert_eq!(interesting, ids(&["A", "B", "C", "D", "F", "H"]));

    assert_eq!(reduced.parents_of("H").unwrap(), &ids(&["D"]));
    assert_eq!(reduced.parents_of("F").unwrap(), &ids(&["B"]));
    assert_eq!(reduced.parents_of("D").unwrap(), &ids(&["C"]));

    for a in &interesting {
        for b in &interesting {
            if a != b && reaches(&full, a, b) {
                assert!(reaches(&reduced, a, b), "{} no longer reaches {}", a, b);
            }
        }
    }
}

#[test]
fn empty_selection_yields_empty_graph() {
    let full = busy_history();
    let filter = CommitFilter::none();

    assert!(filter.selects_nothing());
    let reduced = reduce(&full, &filter.interesting(&full)).unwrap();
    assert!(reduced.is_empty());
}

#[test]
fn disambiguation_is_tight() {
    let ids = [
        "0123456789abcdef0123456789abcdef01234567",
        "0123456789abcdef0123456789abcdef0123ffff",
        "fedcba9876543210fedcba9876543210fedcba98",
    ];
    let n = minimal_prefix_length_of(ids);

    let prefixes: BTreeSet<&str> = ids.iter().map(|id| &id[..n]).collect();
    assert_eq!(prefixes.len(), ids.len());

    let shorter: BTreeSet<&str> = ids.iter().map(|id| &id[..n - 1]).collect();
    assert!(shorter.len() < ids.len());
    assert_eq!(n, 37);
}

#[test]
fn shared_39_character_prefix_needs_full_length() {
    let a = "0123456789abcdef0123456789abcdef0123456a";
    let b = "0123456789abcdef0123456789abcdef0123456b";
    assert_eq!(minimal_prefix_length_of([a, b]), FULL_ID_LEN);
}
