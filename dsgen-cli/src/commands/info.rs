use std::path::Path;

use dsgen::design::DesignTable;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_data_source,
    output::{emit, Fields, Listing, Render},
};

#[derive(Debug, Serialize)]
pub struct DataSetInfo {
    pub name: String,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub tables: Vec<TableInfo>,
    pub relations: Vec<RelationInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub class_name: String,
    pub columns: Vec<ColumnInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,
    pub sources: Vec<SourceInfo>,
}

#[derive(Debug, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
    pub key: bool,
    pub nullable: bool,
    pub auto_increment: bool,
}

#[derive(Debug, Serialize)]
pub struct SourceInfo {
    pub name: String,
    pub query_type: String,
}

#[derive(Debug, Serialize)]
pub struct RelationInfo {
    pub name: String,
    pub parent: String,
    pub child: String,
    pub kind: String,
}

fn table_info(table: &DesignTable) -> TableInfo {
    TableInfo {
        name: table.name().to_string(),
        class_name: table.table_class_name(),
        columns: table
            .columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name().to_string(),
                data_type: c.data_type().to_string(),
                max_length: Some(c.max_length()).filter(|l| *l >= 0),
                key: table.is_key_column(c.name()),
                nullable: c.allow_db_null(),
                auto_increment: c.auto_increment(),
            })
            .collect(),
        adapter: table
            .main_source
            .is_some()
            .then(|| table.adapter_class_name()),
        sources: table
            .all_sources()
            .map(|s| SourceInfo {
                name: s.name.clone(),
                query_type: s.query_type.to_string(),
            })
            .collect(),
    }
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let ds = load_data_source(path)?;

    let info = DataSetInfo {
        name: ds.name.clone(),
        class_name: ds.class_name(),
        provider: ds.provider_name(None),
        tables: ds.tables().iter().map(table_info).collect(),
        relations: ds
            .relations()
            .iter()
            .map(|r| RelationInfo {
                name: r.name.clone(),
                parent: r.parent_table.clone(),
                child: r.child_table.clone(),
                kind: r.kind.to_string(),
            })
            .collect(),
        functions: ds.sources.iter().map(|s| s.name.clone()).collect(),
    };

    emit(&info, opts)
}

impl ColumnInfo {
    fn flags(&self) -> String {
        let mut flags = Vec::new();
        if self.key {
            flags.push("key");
        }
        if self.nullable {
            flags.push("null");
        }
        if self.auto_increment {
            flags.push("identity");
        }
        flags.join(",")
    }
}

impl Render for TableInfo {
    fn render(&self) -> String {
        let mut out = match &self.adapter {
            Some(adapter) => format!("{} [{}]\n", self.class_name, adapter),
            None => format!("{}\n", self.class_name),
        };
        let mut columns = Listing::new(&["Column", "Type", "Length", "Flags"]).indent("  ");
        for column in &self.columns {
            columns.row(vec![
                column.name.clone(),
                column.data_type.clone(),
                column.max_length.map(|l| l.to_string()).unwrap_or_default(),
                column.flags(),
            ]);
        }
        out.push_str(&columns.render());
        for source in &self.sources {
            out.push_str(&format!("  - {} ({})\n", source.name, source.query_type));
        }
        out
    }
}

impl Render for DataSetInfo {
    fn render(&self) -> String {
        let mut out = Fields::new()
            .field("DataSet", format!("{} ({})", self.class_name, self.name))
            .optional("Provider", self.provider.as_deref())
            .to_string();

        for table in &self.tables {
            out.push('\n');
            out.push_str(&table.render());
        }

        let mut relations = Listing::new(&["Relation", "Parent", "Child", "Kind"]);
        for relation in &self.relations {
            relations.row(vec![
                relation.name.clone(),
                relation.parent.clone(),
                relation.child.clone(),
                relation.kind.clone(),
            ]);
        }
        if !relations.is_empty() {
            out.push('\n');
            out.push_str(&relations.render());
        }

        if !self.functions.is_empty() {
            out.push('\n');
            out.push_str(&Fields::new().field("Functions", self.functions.join(", ")).to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> TableInfo {
        TableInfo {
            name: "Orders".to_string(),
            class_name: "OrdersDataTable".to_string(),
            columns: vec![
                ColumnInfo {
                    name: "OrderID".to_string(),
                    data_type: "System.Int32".to_string(),
                    max_length: None,
                    key: true,
                    nullable: false,
                    auto_increment: true,
                },
                ColumnInfo {
                    name: "ShipName".to_string(),
                    data_type: "System.String".to_string(),
                    max_length: Some(40),
                    key: false,
                    nullable: true,
                    auto_increment: false,
                },
            ],
            adapter: Some("OrdersTableAdapter".to_string()),
            sources: vec![SourceInfo {
                name: "Fill".to_string(),
                query_type: "Rowset".to_string(),
            }],
        }
    }

    #[test]
    fn table_lists_columns_and_sources() {
        let text = orders().render();
        assert!(text.starts_with("OrdersDataTable [OrdersTableAdapter]\n"));
        let order_id = text.lines().find(|l| l.contains("OrderID")).unwrap();
        assert!(order_id.starts_with("  OrderID"));
        assert!(order_id.ends_with("key,identity"));
        let ship_name = text.lines().find(|l| l.contains("ShipName")).unwrap();
        assert!(ship_name.contains(" 40  null"));
        assert!(text.ends_with("  - Fill (Rowset)\n"));
    }

    #[test]
    fn data_set_header_relations_and_functions() {
        let info = DataSetInfo {
            name: "Northwind".to_string(),
            class_name: "NorthwindDataSet".to_string(),
            provider: Some("System.Data.SqlClient".to_string()),
            tables: vec![orders()],
            relations: vec![RelationInfo {
                name: "FK_Orders_Customers".to_string(),
                parent: "Customers".to_string(),
                child: "Orders".to_string(),
                kind: "Relation".to_string(),
            }],
            functions: vec!["CountOrders".to_string()],
        };
        let text = info.render();
        assert!(text.starts_with(
            "DataSet:  NorthwindDataSet (Northwind)\nProvider: System.Data.SqlClient\n\n"
        ));
        assert!(text
            .lines()
            .any(|l| l.starts_with("FK_Orders_Customers  Customers  Orders  Relation")));
        assert!(text.ends_with("\nFunctions: CountOrders\n"));
    }
}
