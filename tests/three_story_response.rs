use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector};
use tmd_dynamics::analysis::assembly::StructuralModelBuilder;
use tmd_dynamics::prelude::*;

fn three_story_without_tmd() -> StructuralModel {
    StructuralModel::new("Bare", vec![1000.0, 1000.0, 900.0], vec![1200.0, 1100.0, 900.0])
}

fn impulse(len: usize) -> Vec<f64> {
    let mut wave = vec![0.0; len];
    wave[0] = 100.0;
    wave
}

#[test]
fn first_step_matches_hand_computed_newmark() {
    let model = three_story_without_tmd();
    let result = analyze_response(
        "Bare_impulse",
        &model,
        &Excitation::base(impulse(100)),
        DampingSelection::Explicit(0.02),
    )
    .unwrap();

    // Independent solve of K_eff·a = -M·1·100 from rest
    let system = StructuralModelBuilder::new(&model, 0.02).build().unwrap();
    let m = &system.matrices.mass;
    let k_eff: DMatrix<f64> =
        m + &system.matrices.damping * 0.005 + &system.matrices.stiffness * (0.25 * 0.01 * 0.01);
    let load: DVector<f64> = -(m * DVector::from_element(3, 1.0)) * 100.0;
    let a = k_eff.lu().solve(&load).unwrap();

    for story in 0..3 {
        assert_relative_eq!(result.main[story].acceleration[0], a[story] + 100.0, epsilon = 1e-9);
        assert_relative_eq!(
            result.main[story].displacement[0],
            0.25 * a[story] * 0.01 * 0.01,
            epsilon = 1e-12
        );
    }

    // Reference values of the same scenario
    assert_relative_eq!(result.main[0].acceleration[0], 4.139699882001352, max_relative = 1e-9);
    assert_relative_eq!(result.main[0].displacement[0], -0.0023965075029499664, max_relative = 1e-9);
    assert_relative_eq!(result.main[2].acceleration[0], 0.005722343694543497, max_relative = 1e-6);
    assert_relative_eq!(result.main[0].acceleration[1], 12.656192461840222, max_relative = 1e-9);
    assert_eq!(result.tmd_count(), 0);
    assert_eq!(result.excitation.len(), 100);
}

#[test]
fn system_matrices_have_expected_structure() {
    let model = StructuralModel::default();
    let system = StructuralModelBuilder::new(&model, 0.02).build().unwrap();
    let m = &system.matrices.mass;
    let k = &system.matrices.stiffness;
    let c = &system.matrices.damping;

    assert_eq!(system.dof_count(), 4);
    for i in 0..4 {
        assert!(m[(i, i)] > 0.0);
        for j in 0..4 {
            if i != j {
                assert_eq!(m[(i, j)], 0.0);
            }
            assert_relative_eq!(k[(i, j)], k[(j, i)]);
            assert_relative_eq!(c[(i, j)], c[(j, i)]);
        }
    }
    // The TMD hangs from floor 3 only
    assert!(k[(2, 3)] < 0.0);
    assert_eq!(k[(0, 3)], 0.0);
    assert_eq!(k[(1, 3)], 0.0);
    assert_relative_eq!(system.reference_omega, 15.210190893677758, max_relative = 1e-9);
}

#[test]
fn tuned_damper_reduces_resonant_roof_response() {
    let bare = three_story_without_tmd();
    let f1 = analyze_modal(&bare).unwrap().fundamental().unwrap().frequency;
    let tmd_weight = 0.02 * bare.total_weight();
    let tuned = bare
        .clone()
        .with_tmd(TmdSetting::new(3, tmd_weight, f1 / 1.02));

    let wave: Vec<f64> = (0..3000)
        .map(|i| 50.0 * (2.0 * std::f64::consts::PI * f1 * i as f64 * 0.01).sin())
        .collect();
    let excitation = Excitation::base(wave);
    let damping = DampingSelection::Explicit(0.02);

    let without = analyze_response("bare", &bare, &excitation, damping).unwrap();
    let with = analyze_response("tuned", &tuned, &excitation, damping).unwrap();

    let roof_without = without.main[2].max_abs_displacement();
    let roof_with = with.main[2].max_abs_displacement();
    assert!(
        roof_with < 0.5 * roof_without,
        "roof displacement {} with TMD vs {} without",
        roof_with,
        roof_without
    );
    // The damper itself moves more than the roof
    assert!(with.peaks().max_tmd_dis > roof_with);
    assert_eq!(with.tmd_floors(), vec![3]);
}

#[test]
fn force_mode_truncates_and_skips_unknown_floors() {
    let model = StructuralModel::default();
    let record: Vec<f64> = (0..400).map(|i| (0.1 * i as f64).sin()).collect();
    let excitation = Excitation::force(vec![
        ForceInput::from_record(2, &record, 50.0),
        ForceInput::new(0, vec![1.0; 250]),
        ForceInput::new(7, vec![5.0; 300]),
    ]);

    let result = analyze_response("ModelA_force", &model, &excitation, DampingSelection::Auto).unwrap();
    assert_eq!(result.excitation.len(), 250);
    assert!(result.excitation.iter().all(|&y| y == 0.0));
    assert_eq!(result.main[0].acceleration.len(), 250);
    assert!(result.peaks().max_main_dis > 0.0);

    // Dropping the out-of-range input changes nothing
    let trimmed = Excitation::force(vec![
        ForceInput::from_record(2, &record, 50.0),
        ForceInput::new(0, vec![1.0; 250]),
    ]);
    let reference = analyze_response("ModelA_force", &model, &trimmed, DampingSelection::Auto).unwrap();
    assert_eq!(result, reference);
}

#[test]
fn damping_selection_variants_agree() {
    let model = StructuralModel::default();
    let excitation = Excitation::base(impulse(200));
    let explicit = analyze_response("a", &model, &excitation, DampingSelection::Explicit(0.03)).unwrap();
    let percent = analyze_response("a", &model, &excitation, DampingSelection::Percent(3.0)).unwrap();
    assert_eq!(explicit, percent);

    let auto = analyze_response("a", &model, &excitation, DampingSelection::Auto).unwrap();
    let h = resolve_damping(&model, -1.0).unwrap();
    let resolved = analyze_response("a", &model, &excitation, DampingSelection::Explicit(h)).unwrap();
    assert_eq!(auto, resolved);
}

#[test]
fn batch_preserves_selection_order() {
    let selections = vec![
        ModelSelection::new(three_story_without_tmd(), 1),
        ModelSelection::new(StructuralModel::default(), 0).with_damping(DampingSelection::Percent(2.0)),
    ];
    let results = run_batch(&selections, &Excitation::base(impulse(300)), "impulse").unwrap();
    assert_eq!(results[0].name, "ModelA_impulse");
    assert_eq!(results[1].name, "Bare_impulse");
}

#[test]
fn singular_and_invalid_models_fail_cleanly() {
    let zero_weight = StructuralModel::new("Z", vec![1000.0, 0.0], vec![1200.0, 1100.0]);
    assert!(analyze_response("z", &zero_weight, &Excitation::base(impulse(10)), DampingSelection::Explicit(0.02)).is_err());

    let model = StructuralModel::default();
    assert!(matches!(
        analyze_response("e", &model, &Excitation::base(vec![]), DampingSelection::Auto),
        Err(DynamicsError::InvalidInput(_))
    ));
}

#[test]
fn result_serializes_to_json() {
    let result = analyze_response(
        "ModelA_impulse",
        &StructuralModel::default(),
        &Excitation::base(impulse(20)),
        DampingSelection::Auto,
    )
    .unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: ResponseResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.name, "ModelA_impulse");
    assert_eq!(back.main.len(), 3);
}
