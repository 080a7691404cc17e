//! TMD Dynamics Example - three-story building with a roof damper under a sine wave

use tmd_dynamics::prelude::*;

fn main() {
    env_logger::init();

    println!("=== TMD Dynamics Example: Three-Story Building ===\n");

    // ModelA: 1000/1000/900 kN, 1200/1100/900 kN/cm, 30 kN TMD at 2.5 Hz on floor 3
    let with_tmd = StructuralModel::default();
    let mut bare = with_tmd.clone();
    bare.name = "ModelA_bare".to_string();
    bare.tmd_list.clear();

    // Modal analysis of the building
    let modal = analyze_modal(&with_tmd).expect("Modal analysis failed");
    println!("--- Modes ---");
    for (i, mode) in modal.modes.iter().enumerate() {
        println!(
            "  Mode {}: T = {:.4} s, f = {:.3} Hz, beta = {:.3}, m_eff = {:.1}%",
            i + 1,
            mode.period,
            mode.frequency,
            mode.participation_factor,
            mode.effective_mass_ratio * 100.0
        );
    }

    // Resonant sine: tuned to the fundamental, ramped in and out
    let frequencies = modal.frequencies();
    let f1 = frequencies.first().copied().unwrap_or(1.0);
    let input = SineWaveInput::new(f1, 10).with_ramps(2, 2).with_observation(true);
    let wave: Vec<f64> = make_sine_wave(&input).into_iter().map(|v| 100.0 * v).collect();
    println!("\nSine wave: {:.3} Hz, {} samples, 100 gal peak", f1, wave.len());

    let excitation = Excitation::base(wave);
    let selections = vec![
        ModelSelection::new(with_tmd.clone(), 0),
        ModelSelection::new(bare, 1),
    ];
    let results = run_batch(&selections, &excitation, "sine").expect("Response analysis failed");

    println!("\n--- Peak Response ---");
    for result in &results {
        let peaks = result.peaks();
        println!("  {}", result.name);
        println!("    Max story acceleration:   {:>10.3} gal", peaks.max_main_acc);
        println!("    Max story displacement:   {:>10.4} cm", peaks.max_main_dis);
        if result.tmd_count() > 0 {
            println!("    Max TMD acceleration:     {:>10.3} gal", peaks.max_tmd_acc);
            println!("    Max TMD displacement:     {:>10.4} cm", peaks.max_tmd_dis);
        }
    }

    // Response spectrum of the same record
    let analysis = analyze_wave(&excitation.ground_acceleration(results[0].excitation.len()), &WaveOptions::default())
        .expect("Wave analysis failed");
    let sa = analysis.spectrum.sa();
    let (peak_index, peak_sa) = sa
        .iter()
        .enumerate()
        .fold((0, 0.0_f64), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
    println!("\n--- Wave Analysis (h = 5%) ---");
    println!("  Peak Sa = {:.2} gal at T = {:.3} s", peak_sa, analysis.spectrum.period[peak_index]);
    println!("  amax = {:.2} gal, vmax = {:.3} kine, dmax = {:.4} cm", analysis.amax, analysis.vmax, analysis.dmax);

    println!("\n=== Analysis Complete ===");
}
