use rfdc_mts_core::{
    backend::{BackendError, RfdcBackend},
    converter::{ConverterType, TileId, TileMask},
    dtc::DtcDomain,
    marker::MarkerReading,
};
use rfdc_mts_emulator::RfdcEmulator;

fn open(emulator: RfdcEmulator) -> anyhow::Result<Box<dyn RfdcBackend>> {
    let mut backend: Box<dyn RfdcBackend> = Box::new(emulator);
    backend.open()?;
    Ok(backend)
}

#[test]
fn dtc_scan_sees_unstable_window() -> anyhow::Result<()> {
    let mut emulator = RfdcEmulator::new();
    emulator
        .tile_mut(ConverterType::Adc, TileId::T1)
        .set_unstable(DtcDomain::T1, vec![10..20, 100..104]);
    let mut backend = open(emulator)?;

    let unstable = (0..128u8)
        .map(|code| {
            backend.set_dtc_code(ConverterType::Adc, TileId::T1, DtcDomain::T1, code)?;
            backend.is_sysref_unstable(ConverterType::Adc, TileId::T1, DtcDomain::T1)
        })
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(14, unstable.iter().filter(|&&u| u).count());
    assert!(unstable[10..20].iter().all(|&u| u));
    assert!(unstable[100..104].iter().all(|&u| u));
    assert!(!unstable[20]);
    Ok(())
}

#[rstest::rstest]
#[test]
fn marker_requires_sysref_gate(
    #[values(ConverterType::Adc, ConverterType::Dac)] ty: ConverterType,
) -> anyhow::Result<()> {
    let mut emulator = RfdcEmulator::new();
    emulator
        .tile_mut(ty, TileId::T0)
        .set_base_latency(120)
        .set_marker_count(2);
    let mut backend = open(emulator)?;

    backend.arm_marker(ty, TileMask::TILE0 | TileMask::TILE1, 15)?;
    assert_eq!(None, backend.read_marker(ty, TileId::T0)?);

    backend.set_sysref_gate(ty, TileId::T0, true)?;
    assert!(backend.sysref_gate(ty, TileId::T0)?);
    assert!(backend.is_sysref_captured(ty, TileId::T0)?);
    assert_eq!(
        Some(MarkerReading::new(2, 120)),
        backend.read_marker(ty, TileId::T0)?
    );
    assert_eq!(None, backend.read_marker(ty, TileId::T1)?);
    assert_eq!(None, backend.read_marker(ty, TileId::T2)?);
    Ok(())
}

#[test]
fn sysref_lost() -> anyhow::Result<()> {
    let mut emulator = RfdcEmulator::new();
    emulator
        .tile_mut(ConverterType::Dac, TileId::T3)
        .set_sysref_lost(true);
    let mut backend = open(emulator)?;

    backend.set_sysref_gate(ConverterType::Dac, TileId::T3, true)?;
    assert!(backend.sysref_gate(ConverterType::Dac, TileId::T3)?);
    assert!(!backend.is_sysref_captured(ConverterType::Dac, TileId::T3)?);
    Ok(())
}

#[test]
fn capture_unreadable() -> anyhow::Result<()> {
    let mut emulator = RfdcEmulator::new();
    emulator
        .tile_mut(ConverterType::Adc, TileId::T1)
        .set_capture_unreadable(true);
    let mut backend = open(emulator)?;

    backend.set_sysref_gate(ConverterType::Adc, TileId::T1, true)?;
    assert_eq!(
        Err(BackendError::new(
            "SYSREF capture status is unreadable".to_string()
        )),
        backend.is_sysref_captured(ConverterType::Adc, TileId::T1)
    );
    assert!(!backend.is_sysref_captured(ConverterType::Adc, TileId::T0)?);
    Ok(())
}

#[test]
fn queries() -> anyhow::Result<()> {
    let mut emulator = RfdcEmulator::new();
    emulator.set_mts_supported(ConverterType::Dac, false);
    emulator.set_sysref_freq_done(false);
    emulator
        .tile_mut(ConverterType::Adc, TileId::T2)
        .set_enabled(false)
        .set_fabric_factor(4);
    let backend = open(emulator)?;

    assert!(backend.is_mts_supported(ConverterType::Adc)?);
    assert!(!backend.is_mts_supported(ConverterType::Dac)?);
    assert!(!backend.is_sysref_freq_done()?);
    assert!(!backend.is_tile_enabled(ConverterType::Adc, TileId::T2)?);
    assert!(backend.is_tile_enabled(ConverterType::Dac, TileId::T2)?);
    assert_eq!(4, backend.fabric_factor(ConverterType::Adc, TileId::T2)?);
    assert_eq!(8, backend.fabric_factor(ConverterType::Adc, TileId::T0)?);
    Ok(())
}
