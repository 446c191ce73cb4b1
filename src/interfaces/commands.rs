//! Command handlers behind the `qrispay` binary. Results are written to stdout
//! as JSON; diagnostics go through `tracing`.

use crate::application::gateway::PaymentGateway;
use crate::application::poller::SettlementPoller;
use crate::config::GatewayConfig;
use crate::domain::amount::Amount;
use crate::domain::crc::crc16;
use crate::domain::tlv::{Payload, TlvElement, verify_checksum};
use crate::error::Result;
use crate::infrastructure::okeconnect::HttpMutationFeed;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use tokio::time::Instant;
use tracing::info;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Static QRIS string of the merchant.
    #[arg(short, long)]
    pub qris: String,

    /// Amount to charge, in rupiah.
    #[arg(short, long)]
    pub amount: Amount,

    /// Do not add the random unique fee.
    #[arg(long)]
    pub no_fee: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Merchant id at the mutation feed.
    #[arg(short, long)]
    pub merchant: String,

    /// Access token for the merchant's mutation feed.
    #[arg(short, long)]
    pub token: String,

    /// Amount to look for. Non-digit characters are ignored.
    #[arg(short, long)]
    pub amount: String,
}

#[derive(Args, Debug)]
pub struct CrcArgs {
    /// Text to checksum, usually a payload ending in `6304`.
    pub input: String,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// QRIS payload to decode.
    pub payload: String,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    elements: &'a [TlvElement],
    dynamic: bool,
    merchant_name: Option<&'a str>,
    merchant_city: Option<&'a str>,
    amount: Option<&'a str>,
    checksum_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum_error: Option<String>,
}

fn print_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn poller(config: &GatewayConfig) -> Result<SettlementPoller> {
    let feed = HttpMutationFeed::new(&config.feed.base_url, config.feed_timeout())?;
    Ok(SettlementPoller::with_timeout(Box::new(feed), config.feed_timeout()))
}

pub fn create<W: Write>(config: &GatewayConfig, args: &CreateArgs, out: &mut W) -> Result<()> {
    let max_fee = if args.no_fee {
        0
    } else {
        config.payment.max_unique_fee
    };
    let gateway = PaymentGateway::new(max_fee, config.validity());
    let request = gateway.create_payment(&args.qris, args.amount)?;
    print_json(out, &request)
}

pub async fn status<W: Write>(
    config: &GatewayConfig,
    args: &StatusArgs,
    out: &mut W,
) -> Result<()> {
    let check = poller(config)?
        .check_settlement(&args.merchant, &args.token, &args.amount)
        .await;
    print_json(out, &check)
}

/// Repeats the settlement check every poll interval until the payment settles
/// or the validity window has elapsed.
pub async fn watch<W: Write>(
    config: &GatewayConfig,
    args: &StatusArgs,
    out: &mut W,
) -> Result<()> {
    config.validate()?;
    let poller = poller(config)?;
    let window = config.validity().to_std().unwrap_or_default();
    let deadline = Instant::now() + window;
    let mut interval = tokio::time::interval(config.poll_interval());

    let check = loop {
        interval.tick().await;
        let check = poller
            .check_settlement(&args.merchant, &args.token, &args.amount)
            .await;
        if check.is_settled() || Instant::now() >= deadline {
            break check;
        }
        info!(merchant = %args.merchant, amount = %args.amount, "still pending");
    };
    print_json(out, &check)
}

pub fn crc<W: Write>(args: &CrcArgs, out: &mut W) -> Result<()> {
    writeln!(out, "{}", crc16(&args.input))?;
    Ok(())
}

pub fn inspect<W: Write>(args: &InspectArgs, out: &mut W) -> Result<()> {
    let payload = Payload::parse(&args.payload)?;
    let checksum_error = verify_checksum(&args.payload).err().map(|e| e.to_string());

    let report = InspectReport {
        elements: payload.elements(),
        dynamic: payload.is_dynamic(),
        merchant_name: payload.merchant_name(),
        merchant_city: payload.merchant_city(),
        amount: payload.amount(),
        checksum_valid: checksum_error.is_none(),
        checksum_error,
    };
    print_json(out, &report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrisError;

    const STATIC_QR: &str = "00020101021126660014ID.CO.QRIS.WWW01189360091530225914810215ID10200176114730303UMI5204581253033605802ID5916WARUNG SEDERHANA6008SURABAYA61056025163040439";

    #[test]
    fn test_create_without_fee() {
        let args = CreateArgs {
            qris: STATIC_QR.to_string(),
            amount: Amount::new(5000).unwrap(),
            no_fee: true,
        };
        let mut out = Vec::new();
        create(&GatewayConfig::default(), &args, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["fee"], 0);
        assert!(json["qr_string"].as_str().unwrap().ends_with("630417EF"));
    }

    #[tokio::test]
    async fn test_watch_rejects_zero_poll_interval() {
        let mut config = GatewayConfig::default();
        config.feed.base_url = "http://127.0.0.1:9".into();
        config.payment.poll_interval_secs = 0;
        let args = StatusArgs {
            merchant: "OK1".to_string(),
            token: "token".to_string(),
            amount: "10000".to_string(),
        };
        let mut out = Vec::new();

        let err = watch(&config, &args, &mut out).await.unwrap_err();
        assert!(matches!(err, QrisError::InvalidConfig(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_crc_output() {
        let mut out = Vec::new();
        crc(
            &CrcArgs {
                input: "123456789".to_string(),
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "29B1\n");
    }

    #[test]
    fn test_inspect_reports_tampering() {
        let mut out = Vec::new();
        inspect(
            &InspectArgs {
                payload: STATIC_QR.replace("0439", "0000"),
            },
            &mut out,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["checksum_valid"], false);
        assert_eq!(json["merchant_name"], "WARUNG SEDERHANA");
        assert_eq!(json["dynamic"], false);
    }
}
