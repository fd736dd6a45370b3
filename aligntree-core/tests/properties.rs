use aligntree_core::{
    Aligner, AlignmentGrids, BoundaryPolicy, GapModel, ScoreTable, Sequence, TreeBuilder,
    render_tree,
};
use proptest::prelude::*;

fn dna(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')], 1..=max_len)
}

fn gap_model() -> impl Strategy<Value = GapModel> {
    prop_oneof![
        (-5i32..=0, -3i32..=0).prop_map(|(open, extend)| GapModel::Affine { open, extend }),
        (-5i32..=0).prop_map(|penalty| GapModel::Linear { penalty }),
    ]
}

fn aligner(gaps: GapModel) -> Aligner {
    Aligner::new(ScoreTable::identity(b"ACGT", 2, -1), gaps)
}

fn fill(a: &[u8], b: &[u8], gaps: GapModel) -> (Aligner, Sequence, Sequence, AlignmentGrids) {
    let a = Sequence::new("a", a).unwrap();
    let b = Sequence::new("b", b).unwrap();
    let aligner = aligner(gaps);
    let grids = aligner.align(&a, &b).unwrap();
    (aligner, a, b, grids)
}

proptest! {
    #[test]
    fn boundary_scores_decrease_strictly(a in dna(8), b in dna(8)) {
        let (_, _, _, grids) = fill(&a, &b, GapModel::default());
        let (n, m) = grids.dims();
        prop_assert_eq!(grids.score(0, 0), 0.0);
        for i in 1..=n {
            prop_assert!(grids.score(i, 0) < grids.score(i - 1, 0));
        }
        for j in 1..=m {
            prop_assert!(grids.score(0, j) < grids.score(0, j - 1));
        }
    }

    #[test]
    fn cells_hold_best_candidate_and_exact_ties(a in dna(7), b in dna(7), gaps in gap_model()) {
        let (aligner, a, b, grids) = fill(&a, &b, gaps);
        let (n, m) = grids.dims();
        for i in 1..=n {
            for j in 1..=m {
                let candidates = aligner.candidates(&grids, &a, &b, i, j).unwrap();
                let best = candidates.best();
                prop_assert_eq!(grids.score(i, j), best);
                prop_assert_eq!(grids.path(i, j), candidates.flags());
                prop_assert!(!grids.path(i, j).is_empty());
                prop_assert!(candidates.matched <= best);
                prop_assert!(candidates.deleted <= best);
                prop_assert!(candidates.inserted <= best);
            }
        }
    }

    #[test]
    fn fill_and_render_are_deterministic(a in dna(6), b in dna(6), gaps in gap_model()) {
        let (_, a_seq, b_seq, first) = fill(&a, &b, gaps);
        let (_, _, _, second) = fill(&a, &b, gaps);
        prop_assert_eq!(&first, &second);

        let builder = TreeBuilder::default();
        let tree_one = builder.build(&first, &a_seq, &b_seq).unwrap();
        let tree_two = builder.build(&second, &a_seq, &b_seq).unwrap();
        prop_assert_eq!(render_tree(&tree_one), render_tree(&tree_two));
    }

    #[test]
    fn exhausted_paths_spell_both_sequences(a in dna(6), b in dna(6), gaps in gap_model()) {
        let (_, a_seq, b_seq, grids) = fill(&a, &b, gaps);
        let tree = TreeBuilder::default().build(&grids, &a_seq, &b_seq).unwrap();
        let alignments = tree.alignments();
        prop_assert!(!alignments.is_empty());
        prop_assert_eq!(alignments.len(), tree.leaf_count());

        let expected_a = String::from_utf8(a.clone()).unwrap();
        let expected_b = String::from_utf8(b.clone()).unwrap();
        for alignment in &alignments {
            prop_assert_eq!(alignment.aligned_a.len(), alignment.aligned_b.len());
            prop_assert_eq!(alignment.ungapped_a(), expected_a.clone());
            prop_assert_eq!(alignment.ungapped_b(), expected_b.clone());
        }
    }

    #[test]
    fn every_path_scores_the_optimum(a in dna(6), b in dna(6), gaps in gap_model()) {
        let (aligner, a_seq, b_seq, grids) = fill(&a, &b, gaps);
        let tree = TreeBuilder::default().build(&grids, &a_seq, &b_seq).unwrap();
        for alignment in tree.alignments() {
            let total = aligner.score_alignment(&grids, &a_seq, &b_seq, &alignment).unwrap();
            prop_assert!((total - grids.best_score()).abs() < 1e-9);
        }
    }

    #[test]
    fn single_step_never_grows_the_tree(a in dna(6), b in dna(6)) {
        let (_, a_seq, b_seq, grids) = fill(&a, &b, GapModel::default());
        let full = TreeBuilder::default().build(&grids, &a_seq, &b_seq).unwrap();
        let truncated = TreeBuilder::new(BoundaryPolicy::SingleStep, usize::MAX)
            .build(&grids, &a_seq, &b_seq)
            .unwrap();
        prop_assert!(truncated.len() <= full.len());
        prop_assert_eq!(truncated.leaf_count(), full.leaf_count());
    }
}
