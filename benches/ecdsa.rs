// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand_core::{OsRng, RngCore};

extern crate ecdsa_keys;
use ecdsa_keys::base58;
use ecdsa_keys::KeyPair;
use ecdsa_keys::PrivateKey;
use ecdsa_keys::PublicKey;
use ecdsa_keys::{Address, NetworkParams};

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = OsRng;

    c.bench_function("Create keypair", |bench| {
        bench.iter(|| KeyPair::new(&mut rng, true))
    });

    c.bench_function("Public key from private key", |bench| {
        let skey = PrivateKey::generate(&mut rng, true);
        bench.iter(|| PublicKey::from_private_key(&skey))
    });

    c.bench_function("Sign with low R grinding", |bench| {
        let mut digest = [0u8; 32];
        rng.fill_bytes(&mut digest);

        let skey = PrivateKey::generate(&mut rng, true);

        bench.iter(|| skey.sign(&digest, None))
    });

    c.bench_function("Sign compact", |bench| {
        let mut digest = [0u8; 32];
        rng.fill_bytes(&mut digest);

        let skey = PrivateKey::generate(&mut rng, true);

        bench.iter(|| skey.sign_compact(&digest, None))
    });

    c.bench_function("Verify DER", |bench| {
        let mut digest = [0u8; 32];
        rng.fill_bytes(&mut digest);

        let skey = PrivateKey::generate(&mut rng, true);
        let pkey = skey.public_key();

        let der = skey.sign(&digest, None).unwrap().to_der();

        bench.iter(|| pkey.verify(&digest, &der))
    });

    c.bench_function("Recover from compact", |bench| {
        let mut digest = [0u8; 32];
        rng.fill_bytes(&mut digest);

        let skey = PrivateKey::generate(&mut rng, true);
        let compact = skey.sign_compact(&digest, None).unwrap();

        bench.iter(|| PublicKey::recover_from_compact(&digest, &compact))
    });

    c.bench_function("Encode address", |bench| {
        let pkey = PrivateKey::generate(&mut rng, true).public_key();
        let params = NetworkParams::MAINNET;

        bench.iter(|| Address::from_public_key(&pkey, &params).encode())
    });

    c.bench_function("Decode Base58Check", |bench| {
        let mut payload = [0u8; 33];
        rng.fill_bytes(&mut payload);
        let text = base58::encode_check(&payload);

        bench.iter(|| base58::decode_check(&text))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark);
criterion_main!(benches);
