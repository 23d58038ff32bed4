use booth_client::submission_message;
use booth_core::{format_price, CheckoutError, CheckoutForm, ShippingAddressForm};
use clap::Args;

use crate::locations::{self, LocationPath};
use crate::{session_store, Context};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    pub name: String,
    /// Customer phone, e.g. 01712345678
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: Option<String>,
    /// Street address
    #[arg(long)]
    pub line1: String,
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long, default_value = booth_core::DEFAULT_COUNTRY)]
    pub country: String,
    /// Delivery contact, when different from the customer phone
    #[arg(long)]
    pub delivery_phone: Option<String>,
    #[command(flatten)]
    pub location: LocationPath,
    /// Place the order as a signed-in account rather than a guest
    #[arg(long)]
    pub account: bool,
    /// Fetch location tiers one at a time
    #[arg(long)]
    pub live_locations: bool,
}

impl CheckoutArgs {
    fn form(&self) -> CheckoutForm {
        CheckoutForm {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            shipping_address: ShippingAddressForm {
                line1: self.line1.clone(),
                line2: self.line2.clone(),
                country: self.country.clone(),
                phone: self.delivery_phone.clone(),
                division: self.location.division.clone(),
                district: self.location.district.clone(),
                upazila: self.location.upazila.clone(),
                union: self.location.union.clone(),
            },
            is_guest: !self.account,
        }
    }
}

pub(crate) async fn run(ctx: &Context, args: &CheckoutArgs) -> anyhow::Result<()> {
    let mut session = session_store::load(&ctx.session_path)?;
    let form = args.form();
    let rates = ctx.config.shipping_rates();

    // Field and cart errors are reported before any location lookup.
    if let Err(e) = booth_core::validate_checkout(&session.cart, &form) {
        print_checkout_error(&e);
        anyhow::bail!("checkout not submitted");
    }
    let cascade = locations::select(ctx, &args.location, args.live_locations).await?;

    match ctx
        .client
        .submit_checkout(&mut session, &form, &cascade, &rates)
        .await
    {
        Ok(confirmation) => {
            session_store::save(&ctx.session_path, &session)?;
            println!("order placed: {}", confirmation.order_id);
            println!("total:        {}", format_price(confirmation.summary.total));
            println!("confirmation: {}", confirmation.path);
            Ok(())
        }
        Err(booth_client::ClientError::Checkout(e)) => {
            print_checkout_error(&e);
            anyhow::bail!("checkout not submitted");
        }
        Err(e) => {
            tracing::error!(error = %e, "order submission failed");
            anyhow::bail!("{}", submission_message(&e));
        }
    }
}

fn print_checkout_error(err: &CheckoutError) {
    match err {
        CheckoutError::Invalid(fields) => {
            for field in fields {
                eprintln!("{:<24} {}", field.field, field.message);
            }
        }
        other => eprintln!("{other}"),
    }
}
