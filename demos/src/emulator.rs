mod tests;

use anyhow::Result;

use rfdc_mts::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut emulator = RfdcEmulator::new();
    ConverterType::ALL.into_iter().for_each(|ty| {
        TileId::all()
            .zip([64, 72, 80, 88])
            .for_each(|(tile, latency)| {
                emulator.tile_mut(ty, tile).set_base_latency(latency);
            });
    });
    emulator
        .tile_mut(ConverterType::Adc, TileId::T2)
        .set_unstable(DtcDomain::T1, vec![30..38, 100..110]);

    let cnt = Controller::open(emulator)?;

    tests::run(cnt)
}
