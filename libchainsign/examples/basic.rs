//! Basic example that signs a few receipts on one device and checks the resulting chain.
//!
//! In a real deployment the history would come from wherever the signatures were archived.
use libchainsign::{verify_chain, SigningService};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let service = SigningService::in_memory();

    // First, create a device. The key pair is generated right here and never leaves it.
    let device = service.create_device("ECC", "register 7")?;
    println!("created device {} ({})", device.id, device.algorithm);
    println!("{}", device.public_key.to_pem()?);

    // Sign a few payloads. Each one is chained to the signature before it.
    let mut history = Vec::new();
    for receipt in ["coffee 2.80", "bagel 3.10", "coffee 2.80"] {
        let signed = service.sign_data(&device.id, receipt.as_bytes())?;
        println!(
            "#{}: {} -> {}",
            signed.counter,
            String::from_utf8_lossy(&signed.data),
            String::from_utf8_lossy(&signed.signature),
        );
        history.push(signed);
    }

    // With only the identity, the public key and the ordered history, the chain can be checked.
    match verify_chain(&device.id, &device.public_key, &history) {
        Ok(()) => {
            println!("chain was verified!");
            Ok(())
        }
        Err(e) => {
            eprintln!("chain did not verify: {}", e);
            Err(Box::new(e))
        }
    }
}
