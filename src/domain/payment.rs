use super::transaction::{Amount, BuyerInfo, CardInfo, SellerInfo, TransactionStatus};
use serde::{Deserialize, Serialize};

/// A complete payment submission. Every field is mandatory at the wire boundary;
/// incomplete input is caught earlier by the payment wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Amount,
    pub currency: String,
    pub buyer_info: BuyerInfo,
    pub card_info: CardInfo,
    pub seller_info: SellerInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub transaction_id: String,
    pub amount: Amount,
    pub currency: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PaymentResult {
    pub fn is_approved(&self) -> bool {
        self.status == TransactionStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_request_wire_shape() {
        let request = PaymentRequest {
            amount: "10.50".parse().unwrap(),
            currency: "EUR".to_string(),
            buyer_info: BuyerInfo {
                document: "123".to_string(),
                name: "Ana".to_string(),
            },
            card_info: CardInfo {
                display: "**** 4242".to_string(),
                token: "tok".to_string(),
            },
            seller_info: SellerInfo {
                document: "999".to_string(),
                name: "Shop".to_string(),
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["amount"], "10.50");
        assert_eq!(json["buyerInfo"]["name"], "Ana");
        assert_eq!(json["cardInfo"]["cardInfo"], "**** 4242");
        assert_eq!(json["sellerInfo"]["document"], "999");
    }

    #[test]
    fn test_payment_result_optional_fields() {
        let result: PaymentResult = serde_json::from_str(r#"{"status":"DECLINED"}"#).unwrap();
        assert_eq!(result.status, TransactionStatus::Declined);
        assert!(result.transaction_id.is_none());
        assert!(!result.is_approved());

        assert!(serde_json::from_str::<PaymentResult>(r#"{"status":"MAYBE"}"#).is_err());
    }
}
