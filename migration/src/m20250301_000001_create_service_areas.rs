use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceArea::Table)
                    .if_not_exists()
                    .col(uuid(ServiceArea::Id).primary_key())
                    .col(uuid(ServiceArea::TenantId).not_null())
                    .col(string_len(ServiceArea::Name, 100).not_null())
                    .col(string_null(ServiceArea::Description))
                    .col(boolean(ServiceArea::IsActive).not_null().default(true))
                    .col(json(ServiceArea::Boundary).not_null())
                    .col(
                        decimal_len(ServiceArea::BaseTravelSurcharge, 12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        decimal_len(ServiceArea::PerKmSurcharge, 12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(double(ServiceArea::MaxTravelDistanceKm).not_null())
                    .col(
                        integer(ServiceArea::EstimatedTravelTimeMinutes)
                            .not_null()
                            .default(0),
                    )
                    .col(json(ServiceArea::AvailableServiceIds).not_null())
                    .col(
                        timestamp_with_time_zone(ServiceArea::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ServiceArea::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Matching always filters by tenant + active flag
        manager
            .create_index(
                Index::create()
                    .name("idx_service_area_tenant_active")
                    .table(ServiceArea::Table)
                    .col(ServiceArea::TenantId)
                    .col(ServiceArea::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceArea::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ServiceArea {
    Table,
    Id,
    TenantId,
    Name,
    Description,
    IsActive,
    Boundary,
    BaseTravelSurcharge,
    PerKmSurcharge,
    MaxTravelDistanceKm,
    EstimatedTravelTimeMinutes,
    AvailableServiceIds,
    CreatedAt,
    UpdatedAt,
}
