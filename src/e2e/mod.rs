//! .

mod client;
mod daemon;

use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub(super) fn init_tracing() {
    Lazy::force(&TRACING);
}

pub(super) fn random_bytes(n: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut bytes = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

pub(super) fn gen_package() -> String {
    use rand::Rng;
    let suffix: u32 = rand::thread_rng().r#gen();
    format!("com.kmre.test{suffix:08x}")
}
