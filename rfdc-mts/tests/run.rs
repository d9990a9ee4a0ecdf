use std::time::Duration;

use rfdc_mts::prelude::*;

fn open(emulator: RfdcEmulator) -> anyhow::Result<Controller<RfdcEmulator>> {
    Ok(Controller::open_with_option(
        emulator,
        MtsOption {
            timeout: Duration::from_millis(10),
            ..Default::default()
        },
        StdSleeper,
        RunOption {
            group_interval: Duration::ZERO,
        },
    )?)
}

#[test]
fn run() -> anyhow::Result<()> {
    let mut emulator = RfdcEmulator::new();
    [(TileId::T0, 64), (TileId::T1, 80)]
        .into_iter()
        .for_each(|(tile, latency)| {
            emulator
                .tile_mut(ConverterType::Dac, tile)
                .set_base_latency(latency);
        });
    emulator
        .tile_mut(ConverterType::Adc, TileId::T3)
        .set_base_latency(72)
        .set_fabric_factor(4);
    let mut cnt = open(emulator)?;

    let run = cnt.run(&MtsRequest {
        dac_tiles: TileMask::TILE0 | TileMask::TILE1,
        dac_target_latency: None,
        adc_tiles: TileMask::all(),
        adc_target_latency: Some(80),
    })?;
    assert!(run.is_ok());
    assert_eq!(2, run.reports().count());

    let dac = run.dac.as_ref().ok_or(anyhow::anyhow!("DAC report is missing"))?;
    assert_eq!(ConverterType::Dac, dac.ty);
    assert_eq!(vec![80, 80], dac.latencies());
    assert_eq!([2, 0, 0, 0], dac.config.offset.0);
    assert_eq!(TileId::T0, dac.config.ref_tile);
    assert_eq!(SysrefEnable::Enable, dac.config.sysref_enable);

    let adc = run.adc.as_ref().ok_or(anyhow::anyhow!("ADC report is missing"))?;
    assert_eq!(vec![80, 80, 80, 80], adc.latencies());
    assert_eq!([2, 2, 2, 2], adc.config.offset.0);
    assert_eq!([8, 8, 8, 4], adc.fabric_factor.0);

    TileId::all().try_for_each(|tile| -> anyhow::Result<()> {
        assert!(cnt.mts_enable(ConverterType::Adc, tile)?);
        assert_eq!(TileState::Enabled, cnt.tile_state(ConverterType::Adc, tile));
        Ok(())
    })?;
    assert!(!cnt.mts_enable(ConverterType::Dac, TileId::T2)?);

    cnt.close()?;
    Ok(())
}

#[test]
fn run_skips_empty_group() -> anyhow::Result<()> {
    let mut cnt = open(RfdcEmulator::new())?;

    let run = cnt.run(&MtsRequest {
        adc_tiles: TileMask::TILE1,
        ..Default::default()
    })?;

    assert_eq!(None, run.dac);
    assert!(run.adc.is_some());
    assert!(run.is_ok());
    TileId::all().for_each(|tile| {
        assert_eq!(TileState::Unconfigured, cnt.tile_state(ConverterType::Dac, tile));
    });
    Ok(())
}

#[test]
fn run_continues_after_failure() -> anyhow::Result<()> {
    let mut emulator = RfdcEmulator::new();
    emulator
        .tile_mut(ConverterType::Dac, TileId::T1)
        .set_gate_stuck(true);
    let mut cnt = open(emulator)?;

    let run = cnt.run(&MtsRequest {
        dac_tiles: TileMask::TILE0 | TileMask::TILE1,
        adc_tiles: TileMask::TILE0 | TileMask::TILE1,
        ..Default::default()
    })?;

    assert!(!run.is_ok());
    let dac = run.dac.as_ref().ok_or(anyhow::anyhow!("DAC report is missing"))?;
    assert_eq!(MtsStatus::SYSREF_GATE_ERROR, dac.status());
    assert_eq!([0; 4], dac.config.latency.0);
    assert_eq!(
        "DAC Multi-Tile-Sync did not complete successfully: Sysref gate error",
        dac.to_string()
    );
    assert!(run.adc.as_ref().is_some_and(SyncReport::is_ok));
    Ok(())
}

#[test]
fn run_closed() -> anyhow::Result<()> {
    let mut cnt = open(RfdcEmulator::new())?;
    cnt.backend_mut().close()?;

    assert_eq!(
        Err(MtsError::Closed),
        cnt.run(&MtsRequest {
            adc_tiles: TileMask::all(),
            ..Default::default()
        })
    );
    Ok(())
}

#[test]
fn controller_derefs_to_rfdc() -> anyhow::Result<()> {
    let mut emulator = RfdcEmulator::new();
    emulator.set_master_tile(ConverterType::Dac, TileId::T1);
    let mut cnt = open(emulator)?;

    assert_eq!(TileId::T1, cnt.master_tile(ConverterType::Dac)?);

    let mut config = SyncConfig::new(None, None, TileId::T2);
    config.tiles = TileMask::TILE2 | TileMask::TILE3;
    cnt.multi_converter_sync(ConverterType::Dac, &mut config)?;
    assert!(cnt.mts_enable(ConverterType::Dac, TileId::T3)?);
    Ok(())
}

#[test]
fn default_run_option() {
    assert_eq!(Duration::from_millis(500), RunOption::default().group_interval);
}
