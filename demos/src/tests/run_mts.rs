use rfdc_mts::prelude::*;

fn print(run: &MtsRun) {
    run.reports().for_each(|report| {
        println!("{report}");
        println!("{} latencies: {:?}", report.ty, report.latencies());
    });
}

pub fn run_mts<B: RfdcBackend>(cnt: &mut Controller<B>) -> anyhow::Result<()> {
    let run = cnt.run(&MtsRequest {
        dac_tiles: TileMask::all(),
        adc_tiles: TileMask::all(),
        ..Default::default()
    })?;
    print(&run);
    Ok(())
}

pub fn run_mts_with_target<B: RfdcBackend>(cnt: &mut Controller<B>) -> anyhow::Result<()> {
    let run = cnt.run(&MtsRequest {
        dac_tiles: TileMask::TILE0 | TileMask::TILE1,
        dac_target_latency: Some(128),
        adc_tiles: TileMask::TILE0 | TileMask::TILE1,
        adc_target_latency: Some(96),
    })?;
    print(&run);
    Ok(())
}
