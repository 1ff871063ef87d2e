use serde::{Deserialize, Serialize};

use crate::modules::gateways::models::{GatewayEndpoints, GatewayEnvironment, GatewayKind};

/// A bank the registry can build a gateway for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDefinition {
    /// Registry id, also the account's `bank` value
    pub id: String,
    pub name: String,
    pub kind: GatewayKind,
    pub endpoints: GatewayEndpoints,
}

impl BankDefinition {
    /// Prefix of the environment variables overriding this bank's URLs,
    /// e.g. `POS_QNBFINANSBANK_PAYFOR`
    pub fn env_prefix(&self) -> String {
        format!("POS_{}", self.id.to_uppercase().replace('-', "_"))
    }
}

fn endpoints(api: &str, gateway_3d: &str, host: Option<&str>, query: Option<&str>) -> GatewayEndpoints {
    GatewayEndpoints {
        api_url: api.to_string(),
        gateway_3d_url: Some(gateway_3d.to_string()),
        gateway_3d_host_url: host.map(str::to_string),
        query_api_url: query.map(str::to_string),
    }
}

fn est(id: &str, name: &str, kind: GatewayKind, base: &str) -> BankDefinition {
    let gate = format!("{}/fim/est3Dgate", base);
    BankDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        endpoints: endpoints(&format!("{}/fim/api", base), &gate, Some(&gate), None),
    }
}

/// Built-in banks with their URLs for `environment`
pub fn default_banks(environment: GatewayEnvironment) -> Vec<BankDefinition> {
    let test = environment == GatewayEnvironment::Test;
    let est_test = "https://entegrasyon.asseco-see.com.tr";
    let akbank = if test { est_test } else { "https://www.sanalakpos.com" };
    let isbank = if test { est_test } else { "https://sanalpos.isbank.com.tr" };
    let ziraat = if test { est_test } else { "https://sanalpos2.ziraatbank.com.tr" };

    let inter = if test {
        "https://test.inter-vpos.com.tr/mpi"
    } else {
        "https://inter-vpos.com.tr/mpi"
    };
    let payfor = if test {
        "https://vpostest.qnbfinansbank.com/Gateway"
    } else {
        "https://vpos.qnbfinansbank.com/Gateway"
    };
    let (payflex_api, payflex_cp) = if test {
        (
            "https://onlineodemetest.vakifbank.com.tr:4443/VposService/v3/Vposreq.aspx",
            "https://cptest.vakifbank.com.tr/CommonPayment/api",
        )
    } else {
        (
            "https://onlineodeme.vakifbank.com.tr:4443/VposService/v3/Vposreq.aspx",
            "https://cpweb.vakifbank.com.tr/CommonPayment/api",
        )
    };
    let payflex_register = format!("{}/RegisterTransaction", payflex_cp);
    let payflex_query = format!("{}/VposTransaction", payflex_cp);

    vec![
        est("akbank", "AKBANK T.A.S.", GatewayKind::EstPos, akbank),
        est("isbank", "İşbank T.A.S.", GatewayKind::EstPos, isbank),
        est("ziraat", "Ziraat Bankası", GatewayKind::EstPos, ziraat),
        est("akbankv3", "AKBANK T.A.S.", GatewayKind::EstV3Pos, akbank),
        est("isbankv3", "İşbank T.A.S.", GatewayKind::EstV3Pos, isbank),
        BankDefinition {
            id: "denizbank".to_string(),
            name: "DenizBank-InterPos".to_string(),
            kind: GatewayKind::InterPos,
            endpoints: endpoints(
                &format!("{}/Default.aspx", inter),
                &format!("{}/Default.aspx", inter),
                Some(&format!("{}/3DHost.aspx", inter)),
                None,
            ),
        },
        BankDefinition {
            id: "qnbfinansbank-payfor".to_string(),
            name: "QNBFinansbank-PayFor".to_string(),
            kind: GatewayKind::PayForPos,
            endpoints: endpoints(
                &format!("{}/XMLGate.aspx", payfor),
                &format!("{}/Default.aspx", payfor),
                Some(&format!("{}/3DHost.aspx", payfor)),
                None,
            ),
        },
        BankDefinition {
            id: "vakifbank-cp".to_string(),
            name: "VakifBank-PayFlex-Common-Payment".to_string(),
            kind: GatewayKind::PayFlexCpV4Pos,
            endpoints: endpoints(
                payflex_api,
                &payflex_register,
                Some(&payflex_register),
                Some(&payflex_query),
            ),
        },
    ]
}
