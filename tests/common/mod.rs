pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Schema block shared by the fixture documents: three layout fields and one
/// portal with two related fields.
pub const ORDERS_METADATA: &str = r#"
<field-definition auto-enter="no" four-digit-year="no" global="no" max-repeat="1" name="Title" not-empty="yes" numeric-only="no" result="text" time-of-day="no" type="normal"/>
<field-definition auto-enter="no" four-digit-year="no" global="no" max-repeat="3" name="Notes" not-empty="no" numeric-only="no" result="text" time-of-day="no" type="normal"/>
<field-definition auto-enter="yes" four-digit-year="no" global="no" max-repeat="1" name="Due Date" not-empty="no" numeric-only="no" result="date" time-of-day="no" type="normal"/>
<relatedset-definition table="Line Items">
<field-definition auto-enter="no" four-digit-year="no" global="no" max-repeat="1" name="Line Items::Delivery Time" not-empty="no" numeric-only="no" result="time" time-of-day="no" type="normal"/>
<field-definition auto-enter="no" four-digit-year="no" global="no" max-repeat="1" name="Line Items::Qty" not-empty="no" numeric-only="yes" result="number" time-of-day="no" type="normal"/>
</relatedset-definition>
"#;

pub const ORDERS_RECORDS: &str = r#"
<record mod-id="5" record-id="101">
<field name="Title"><data>First order</data></field>
<field name="Notes"><data>a</data><data>b</data><data>c</data></field>
<field name="Due Date"><data>01/15/2011</data></field>
<relatedset count="2" table="Line Items">
<record mod-id="0" record-id="201"><field name="Line Items::Delivery Time"><data>09:30:00</data></field><field name="Line Items::Qty"><data>3</data></field></record>
<record mod-id="0" record-id="202"><field name="Line Items::Delivery Time"><data>14:00:00</data></field><field name="Line Items::Qty"><data>1</data></field></record>
</relatedset>
</record>
<record mod-id="1" record-id="102">
<field name="Title"><data>Second order</data></field>
<field name="Notes"/>
<field name="Due Date"><data>02/01/2011</data></field>
<relatedset count="0" table="Line Items"/>
</record>
"#;

/// A complete, well-formed server response.
pub fn document(error_code: &str, version: &str, metadata: &str, records: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<fmresultset xmlns="http://www.filemaker.com/xml/fmresultset" version="1.0">
<error code="{error_code}"/>
<product build="03/05/2011" name="FileMaker Web Publishing Engine" version="{version}"/>
<datasource database="Orders" date-format="MM/dd/yyyy" layout="OrderList" table="Orders" time-format="HH:mm:ss" timestamp-format="MM/dd/yyyy HH:mm:ss" total-count="120"/>
<metadata>{metadata}</metadata>
<resultset count="2" fetch-size="2">{records}</resultset>
</fmresultset>"#
    )
}

pub fn orders_document() -> String {
    document("0", "11.0.1.95", ORDERS_METADATA, ORDERS_RECORDS)
}
